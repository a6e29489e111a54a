use std::sync::Arc;

use chrono::{Months, Utc};

use super::converter::assemble_student_details;
use super::domain::{
    ApplicationStatus, ApplicationStatusKind, CourseEnrollment, StudentDetail,
    StudentSearchCriteria,
};
use super::repository::{RepositoryError, RosterRepository};

/// Service joining roster reads through the aggregation step and splitting
/// roster writes into their storage operation sequence.
///
/// Stateless: operates only on its arguments and the storage collaborator.
/// Each public write acquires exactly one transaction scope.
pub struct StudentService<R> {
    repository: Arc<R>,
}

impl<R> StudentService<R>
where
    R: RosterRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Full roster listing: every student with its enrollments and statuses.
    pub fn search_student_list(&self) -> Result<Vec<StudentDetail>, ServiceError> {
        let students = self.repository.find_all_students()?;
        let enrollments = self.repository.find_all_enrollments()?;
        let statuses = self.repository.find_all_statuses()?;

        Ok(assemble_student_details(students, enrollments, statuses))
    }

    /// Looks up one student with its enrollments. An unknown id propagates as
    /// `Ok(None)` so the boundary layer can decide on a 404.
    pub fn search_student(&self, id: i32) -> Result<Option<StudentDetail>, ServiceError> {
        let Some(student) = self.repository.find_student_by_id(id)? else {
            return Ok(None);
        };

        let enrollments = self.repository.find_enrollments_by_student_id(id)?;
        let statuses = self.repository.find_all_statuses()?;

        let mut details = assemble_student_details(vec![student], enrollments, statuses);
        Ok(if details.is_empty() {
            None
        } else {
            Some(details.remove(0))
        })
    }

    /// Query-by-criteria over students; unset criteria fields are
    /// unconstrained. An empty student match short-circuits without touching
    /// the enrollment or status tables.
    pub fn search_students_matching(
        &self,
        criteria: &StudentSearchCriteria,
    ) -> Result<Vec<StudentDetail>, ServiceError> {
        let students = self.repository.find_students_matching(criteria)?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i32> = students.iter().filter_map(|student| student.id).collect();
        let enrollments = self
            .repository
            .find_enrollments_by_student_ids(&student_ids)?;
        let statuses = self.repository.find_all_statuses()?;

        Ok(assemble_student_details(students, enrollments, statuses))
    }

    /// Registers a student together with its course enrollments in one
    /// transaction. Returns the detail populated with every assigned id; each
    /// new enrollment also carries its freshly created provisional status.
    pub fn register_student(&self, detail: StudentDetail) -> Result<StudentDetail, ServiceError> {
        self.within_transaction(|| {
            let mut student = detail.student;
            let student_id = self.repository.insert_student(&student)?;
            student.id = Some(student_id);

            let mut courses = Vec::with_capacity(detail.courses.len());
            for enrollment in detail.courses {
                courses.push(self.register_enrollment(enrollment, Some(student_id))?);
            }

            Ok(StudentDetail { student, courses })
        })
    }

    /// Updates a student and reconciles its enrollment list in one
    /// transaction. Enrollments without an id are treated as new (insert plus
    /// provisional status); enrollments with an id are modified in place. An
    /// empty course list is a supported no-op for courses.
    pub fn update_student(&self, detail: StudentDetail) -> Result<(), ServiceError> {
        self.within_transaction(|| {
            self.repository.update_student(&detail.student)?;

            for enrollment in detail.courses {
                match enrollment.id {
                    None => {
                        self.register_enrollment(enrollment, detail.student.id)?;
                    }
                    Some(_) => self.modify_enrollment(&enrollment)?,
                }
            }

            Ok(())
        })
    }

    /// All application statuses, across every enrollment.
    pub fn application_status_list(&self) -> Result<Vec<ApplicationStatus>, ServiceError> {
        Ok(self.repository.find_all_statuses()?)
    }

    /// The application status attached to one enrollment, if any.
    pub fn application_status(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<ApplicationStatus>, ServiceError> {
        Ok(self.repository.find_status_by_enrollment_id(enrollment_id)?)
    }

    /// Creation path for one enrollment: initialize, insert, then create the
    /// provisional application status referencing the new enrollment id.
    fn register_enrollment(
        &self,
        mut enrollment: CourseEnrollment,
        student_id: Option<i32>,
    ) -> Result<CourseEnrollment, ServiceError> {
        init_enrollment(&mut enrollment, student_id);
        let enrollment_id = self.repository.insert_enrollment(&enrollment)?;
        enrollment.id = Some(enrollment_id);

        let mut status = provisional_status(enrollment_id);
        let status_id = self.repository.insert_status(&status)?;
        status.id = Some(status_id);
        enrollment.application_status = Some(status);

        Ok(enrollment)
    }

    /// Modification path for one enrollment: persist the name change, then
    /// touch the attached status when it carries its own identity. A missing
    /// or identity-less status is not an error; no status write happens.
    fn modify_enrollment(&self, enrollment: &CourseEnrollment) -> Result<(), ServiceError> {
        self.repository.update_enrollment(enrollment)?;

        if let Some(status) = &enrollment.application_status {
            if status.id.is_some() {
                let mut touched = status.clone();
                touched.updated_at = Some(Utc::now());
                self.repository.update_status(&touched)?;
            }
        }

        Ok(())
    }

    fn within_transaction<T>(
        &self,
        work: impl FnOnce() -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        self.repository.begin_transaction()?;
        match work() {
            Ok(value) => {
                self.repository.commit_transaction()?;
                Ok(value)
            }
            Err(err) => {
                // Rollback failure is secondary to the original error.
                let _ = self.repository.rollback_transaction();
                Err(err)
            }
        }
    }
}

/// Sets the initial values for a new enrollment: owning student, course
/// window start = now, end = one year later.
fn init_enrollment(enrollment: &mut CourseEnrollment, student_id: Option<i32>) {
    let now = Utc::now();
    enrollment.student_id = student_id;
    enrollment.course_start_at = Some(now);
    enrollment.course_end_at = now.checked_add_months(Months::new(12));
}

fn provisional_status(enrollment_id: i32) -> ApplicationStatus {
    let now = Utc::now();
    ApplicationStatus {
        id: None,
        course_id: Some(enrollment_id),
        status: ApplicationStatusKind::ProvisionalApplication.label().to_string(),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

/// Error raised by the student service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
