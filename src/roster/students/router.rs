use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationStatusKind, StudentDetail, StudentSearchCriteria};
use super::repository::RosterRepository;
use super::service::{ServiceError, StudentService};
use super::validation::{validate_registration, validate_update};

/// Router builder exposing the roster HTTP endpoints.
pub fn student_router<R>(service: Arc<StudentService<R>>) -> Router
where
    R: RosterRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/students",
            get(search_students_handler::<R>)
                .post(register_student_handler::<R>)
                .put(update_student_handler::<R>),
        )
        .route("/api/v1/students/:id", get(get_student_handler::<R>))
        .route(
            "/api/v1/application-statuses",
            get(status_list_handler::<R>),
        )
        .route(
            "/api/v1/application-statuses/options",
            get(status_options_handler),
        )
        .route(
            "/api/v1/application-statuses/:enrollment_id",
            get(status_handler::<R>),
        )
        .with_state(service)
}

/// Query parameters mirroring the search filter template; every field is
/// optional and unset fields are unconstrained.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudentSearchQuery {
    id: Option<i32>,
    name: Option<String>,
    kana_name: Option<String>,
    nickname: Option<String>,
    email: Option<String>,
    area: Option<String>,
    age: Option<i32>,
    sex: Option<String>,
}

impl StudentSearchQuery {
    fn into_criteria(self) -> StudentSearchCriteria {
        StudentSearchCriteria {
            id: self.id,
            name: self.name,
            kana_name: self.kana_name,
            nickname: self.nickname,
            email: self.email,
            area: self.area,
            age: self.age,
            sex: self.sex,
        }
    }
}

pub(crate) async fn get_student_handler<R>(
    State(service): State<Arc<StudentService<R>>>,
    Path(id): Path<i32>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.search_student(id) {
        Ok(Some(detail)) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("no student with id {id}") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => storage_failure(err),
    }
}

pub(crate) async fn search_students_handler<R>(
    State(service): State<Arc<StudentService<R>>>,
    Query(query): Query<StudentSearchQuery>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.search_students_matching(&query.into_criteria()) {
        Ok(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        Err(err) => storage_failure(err),
    }
}

pub(crate) async fn register_student_handler<R>(
    State(service): State<Arc<StudentService<R>>>,
    axum::Json(detail): axum::Json<StudentDetail>,
) -> Response
where
    R: RosterRepository + 'static,
{
    if let Err(violation) = validate_registration(&detail) {
        let payload = json!({ "error": violation.to_string() });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.register_student(detail) {
        Ok(registered) => (StatusCode::OK, axum::Json(registered)).into_response(),
        Err(err) => storage_failure(err),
    }
}

pub(crate) async fn update_student_handler<R>(
    State(service): State<Arc<StudentService<R>>>,
    axum::Json(detail): axum::Json<StudentDetail>,
) -> Response
where
    R: RosterRepository + 'static,
{
    if let Err(violation) = validate_update(&detail) {
        let payload = json!({ "error": violation.to_string() });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.update_student(detail) {
        Ok(()) => {
            let payload = json!({ "message": "student updated" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => storage_failure(err),
    }
}

pub(crate) async fn status_list_handler<R>(
    State(service): State<Arc<StudentService<R>>>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.application_status_list() {
        Ok(statuses) => (StatusCode::OK, axum::Json(statuses)).into_response(),
        Err(err) => storage_failure(err),
    }
}

/// Static vocabulary of the four application-status labels, for presentation.
pub(crate) async fn status_options_handler() -> Response {
    let options: Vec<&'static str> = ApplicationStatusKind::ALL
        .iter()
        .map(|kind| kind.label())
        .collect();
    (StatusCode::OK, axum::Json(options)).into_response()
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<StudentService<R>>>,
    Path(enrollment_id): Path<i32>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.application_status(enrollment_id) {
        Ok(Some(status)) => (StatusCode::OK, axum::Json(status)).into_response(),
        Ok(None) => {
            let payload =
                json!({ "error": format!("no application status for enrollment {enrollment_id}") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => storage_failure(err),
    }
}

fn storage_failure(err: ServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
