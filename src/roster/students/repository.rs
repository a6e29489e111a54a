use super::domain::{ApplicationStatus, CourseEnrollment, Student, StudentSearchCriteria};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Insert methods leave id assignment to the adapter and return the new id.
/// Update methods address a row by id; an id matching no row completes as a
/// zero-row write rather than an error. Multi-step writes are demarcated by
/// the caller through the transaction methods, one scope per public write
/// operation.
pub trait RosterRepository: Send + Sync {
    fn find_all_students(&self) -> Result<Vec<Student>, RepositoryError>;
    fn find_student_by_id(&self, id: i32) -> Result<Option<Student>, RepositoryError>;
    fn find_students_matching(
        &self,
        criteria: &StudentSearchCriteria,
    ) -> Result<Vec<Student>, RepositoryError>;

    fn find_all_enrollments(&self) -> Result<Vec<CourseEnrollment>, RepositoryError>;
    fn find_enrollments_by_student_id(
        &self,
        student_id: i32,
    ) -> Result<Vec<CourseEnrollment>, RepositoryError>;
    fn find_enrollments_by_student_ids(
        &self,
        student_ids: &[i32],
    ) -> Result<Vec<CourseEnrollment>, RepositoryError>;

    fn insert_student(&self, student: &Student) -> Result<i32, RepositoryError>;
    fn update_student(&self, student: &Student) -> Result<(), RepositoryError>;

    fn insert_enrollment(&self, enrollment: &CourseEnrollment) -> Result<i32, RepositoryError>;
    /// Persists the enrollment's mutable fields (the course name) by id.
    fn update_enrollment(&self, enrollment: &CourseEnrollment) -> Result<(), RepositoryError>;

    fn find_all_statuses(&self) -> Result<Vec<ApplicationStatus>, RepositoryError>;
    fn find_status_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<ApplicationStatus>, RepositoryError>;
    fn insert_status(&self, status: &ApplicationStatus) -> Result<i32, RepositoryError>;
    fn update_status(&self, status: &ApplicationStatus) -> Result<(), RepositoryError>;

    fn begin_transaction(&self) -> Result<(), RepositoryError>;
    fn commit_transaction(&self) -> Result<(), RepositoryError>;
    fn rollback_transaction(&self) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
