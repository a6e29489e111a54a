use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person enrolled in the program.
///
/// `id` stays `None` until the storage layer assigns one; records are never
/// physically deleted, only flagged via `is_deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Student {
    pub id: Option<i32>,
    pub name: String,
    pub kana_name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// A record linking a student to a course offering with a start/end window.
///
/// The window is system-assigned at enrollment time (start = now, end = one
/// year later), never caller-supplied. `application_status` is populated by
/// the aggregation step on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub id: Option<i32>,
    #[serde(default)]
    pub student_id: Option<i32>,
    pub course_name: String,
    #[serde(default)]
    pub course_start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub course_end_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_status: Option<ApplicationStatus>,
}

/// The approval-stage record attached to one enrollment.
///
/// `course_id` stores the owning enrollment's id (1:1). The stored label is a
/// free string so generic status updates accept any value; the canonical
/// vocabulary lives in [`ApplicationStatusKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    pub id: Option<i32>,
    pub course_id: Option<i32>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The fixed application-status vocabulary, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatusKind {
    ProvisionalApplication,
    FullApplication,
    InProgress,
    Completed,
}

impl ApplicationStatusKind {
    pub const ALL: [ApplicationStatusKind; 4] = [
        ApplicationStatusKind::ProvisionalApplication,
        ApplicationStatusKind::FullApplication,
        ApplicationStatusKind::InProgress,
        ApplicationStatusKind::Completed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatusKind::ProvisionalApplication => "provisional-application",
            ApplicationStatusKind::FullApplication => "full-application",
            ApplicationStatusKind::InProgress => "in-progress",
            ApplicationStatusKind::Completed => "completed",
        }
    }
}

/// Composite read/write view joining one student with its enrollments.
///
/// Assembled on read, decomposed on write; never stored as its own record.
/// Once persisted, every enrollment in `courses` carries `student_id`
/// equal to `student.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
    pub student: Student,
    #[serde(default)]
    pub courses: Vec<CourseEnrollment>,
}

/// Partially-populated filter template over student fields.
///
/// Unset fields are unconstrained. Text fields match by substring, scalar
/// fields by equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSearchCriteria {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub kana_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub area: Option<String>,
    pub age: Option<i32>,
    pub sex: Option<String>,
}

impl StudentSearchCriteria {
    pub fn matches(&self, student: &Student) -> bool {
        if let Some(id) = self.id {
            if student.id != Some(id) {
                return false;
            }
        }
        if let Some(age) = self.age {
            if student.age != Some(age) {
                return false;
            }
        }
        if let Some(sex) = self.sex.as_deref() {
            if student.sex.as_deref() != Some(sex) {
                return false;
            }
        }

        text_matches(Some(student.name.as_str()), self.name.as_deref())
            && text_matches(Some(student.kana_name.as_str()), self.kana_name.as_deref())
            && text_matches(student.nickname.as_deref(), self.nickname.as_deref())
            && text_matches(Some(student.email.as_str()), self.email.as_deref())
            && text_matches(student.area.as_deref(), self.area.as_deref())
    }
}

fn text_matches(value: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => value.map(|value| value.contains(needle)).unwrap_or(false),
    }
}
