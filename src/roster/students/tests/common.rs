use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::infra::InMemoryRosterRepository;
use crate::roster::students::domain::{
    ApplicationStatus, CourseEnrollment, Student, StudentDetail,
};
use crate::roster::students::repository::{RepositoryError, RosterRepository};
use crate::roster::students::service::StudentService;
use crate::roster::students::StudentSearchCriteria;

/// Write and demarcation operations the recording repository keeps track of,
/// so tests can assert the exact storage sequence a service call produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Op {
    Begin,
    Commit,
    Rollback,
    InsertStudent,
    UpdateStudent,
    InsertEnrollment,
    UpdateEnrollment,
    InsertStatus,
    UpdateStatus,
}

/// Storage double delegating to the in-memory adapter while logging write
/// operations; a single operation can be armed to fail for rollback tests.
pub(super) struct RecordingRepository {
    inner: InMemoryRosterRepository,
    log: Mutex<Vec<Op>>,
    fail_on: Option<Op>,
}

impl RecordingRepository {
    pub(super) fn new() -> Self {
        Self {
            inner: InMemoryRosterRepository::default(),
            log: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub(super) fn failing_on(op: Op) -> Self {
        Self {
            fail_on: Some(op),
            ..Self::new()
        }
    }

    pub(super) fn ops(&self) -> Vec<Op> {
        self.log.lock().expect("log mutex poisoned").clone()
    }

    pub(super) fn count(&self, op: Op) -> usize {
        self.ops().iter().filter(|entry| **entry == op).count()
    }

    fn record(&self, op: Op) -> Result<(), RepositoryError> {
        if self.fail_on == Some(op) {
            return Err(RepositoryError::Unavailable("injected failure".to_string()));
        }
        self.log.lock().expect("log mutex poisoned").push(op);
        Ok(())
    }
}

impl RosterRepository for RecordingRepository {
    fn find_all_students(&self) -> Result<Vec<Student>, RepositoryError> {
        self.inner.find_all_students()
    }

    fn find_student_by_id(&self, id: i32) -> Result<Option<Student>, RepositoryError> {
        self.inner.find_student_by_id(id)
    }

    fn find_students_matching(
        &self,
        criteria: &StudentSearchCriteria,
    ) -> Result<Vec<Student>, RepositoryError> {
        self.inner.find_students_matching(criteria)
    }

    fn find_all_enrollments(&self) -> Result<Vec<CourseEnrollment>, RepositoryError> {
        self.inner.find_all_enrollments()
    }

    fn find_enrollments_by_student_id(
        &self,
        student_id: i32,
    ) -> Result<Vec<CourseEnrollment>, RepositoryError> {
        self.inner.find_enrollments_by_student_id(student_id)
    }

    fn find_enrollments_by_student_ids(
        &self,
        student_ids: &[i32],
    ) -> Result<Vec<CourseEnrollment>, RepositoryError> {
        self.inner.find_enrollments_by_student_ids(student_ids)
    }

    fn insert_student(&self, student: &Student) -> Result<i32, RepositoryError> {
        self.record(Op::InsertStudent)?;
        self.inner.insert_student(student)
    }

    fn update_student(&self, student: &Student) -> Result<(), RepositoryError> {
        self.record(Op::UpdateStudent)?;
        self.inner.update_student(student)
    }

    fn insert_enrollment(&self, enrollment: &CourseEnrollment) -> Result<i32, RepositoryError> {
        self.record(Op::InsertEnrollment)?;
        self.inner.insert_enrollment(enrollment)
    }

    fn update_enrollment(&self, enrollment: &CourseEnrollment) -> Result<(), RepositoryError> {
        self.record(Op::UpdateEnrollment)?;
        self.inner.update_enrollment(enrollment)
    }

    fn find_all_statuses(&self) -> Result<Vec<ApplicationStatus>, RepositoryError> {
        self.inner.find_all_statuses()
    }

    fn find_status_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<ApplicationStatus>, RepositoryError> {
        self.inner.find_status_by_enrollment_id(enrollment_id)
    }

    fn insert_status(&self, status: &ApplicationStatus) -> Result<i32, RepositoryError> {
        self.record(Op::InsertStatus)?;
        self.inner.insert_status(status)
    }

    fn update_status(&self, status: &ApplicationStatus) -> Result<(), RepositoryError> {
        self.record(Op::UpdateStatus)?;
        self.inner.update_status(status)
    }

    fn begin_transaction(&self) -> Result<(), RepositoryError> {
        self.record(Op::Begin)?;
        self.inner.begin_transaction()
    }

    fn commit_transaction(&self) -> Result<(), RepositoryError> {
        self.record(Op::Commit)?;
        self.inner.commit_transaction()
    }

    fn rollback_transaction(&self) -> Result<(), RepositoryError> {
        self.record(Op::Rollback)?;
        self.inner.rollback_transaction()
    }
}

pub(super) fn student() -> Student {
    Student {
        id: None,
        name: "Taro Yamada".to_string(),
        kana_name: "yamada taro".to_string(),
        nickname: Some("Taro".to_string()),
        email: "taro@example.com".to_string(),
        area: Some("Tokyo".to_string()),
        age: Some(24),
        sex: Some("male".to_string()),
        remark: None,
        is_deleted: false,
    }
}

pub(super) fn persisted_student(id: i32, name: &str) -> Student {
    Student {
        id: Some(id),
        name: name.to_string(),
        kana_name: name.to_ascii_lowercase(),
        email: format!("{}@example.com", name.to_ascii_lowercase().replace(' ', ".")),
        ..student()
    }
}

pub(super) fn enrollment(course_name: &str) -> CourseEnrollment {
    CourseEnrollment {
        id: None,
        student_id: None,
        course_name: course_name.to_string(),
        course_start_at: None,
        course_end_at: None,
        application_status: None,
    }
}

pub(super) fn persisted_enrollment(id: i32, student_id: i32, course_name: &str) -> CourseEnrollment {
    CourseEnrollment {
        id: Some(id),
        student_id: Some(student_id),
        ..enrollment(course_name)
    }
}

pub(super) fn status_row(id: i32, course_id: i32, label: &str) -> ApplicationStatus {
    ApplicationStatus {
        id: Some(id),
        course_id: Some(course_id),
        status: label.to_string(),
        created_at: None,
        updated_at: None,
    }
}

pub(super) fn registration_detail(courses: Vec<CourseEnrollment>) -> StudentDetail {
    StudentDetail {
        student: student(),
        courses,
    }
}

pub(super) fn build_service() -> (StudentService<RecordingRepository>, Arc<RecordingRepository>) {
    let repository = Arc::new(RecordingRepository::new());
    let service = StudentService::new(repository.clone());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
