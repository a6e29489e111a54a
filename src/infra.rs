use std::sync::Mutex;

use crate::roster::students::domain::{
    ApplicationStatus, CourseEnrollment, Student, StudentSearchCriteria,
};
use crate::roster::students::repository::{RepositoryError, RosterRepository};

/// Reference storage adapter backed by in-process tables.
///
/// Ids are assigned sequentially per table, mirroring auto-increment columns.
/// Writes are applied eagerly, so transaction demarcation is a no-op here; a
/// SQL adapter would map the three methods onto real BEGIN/COMMIT/ROLLBACK.
#[derive(Default)]
pub struct InMemoryRosterRepository {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    students: Vec<Student>,
    enrollments: Vec<CourseEnrollment>,
    statuses: Vec<ApplicationStatus>,
    next_student_id: i32,
    next_enrollment_id: i32,
    next_status_id: i32,
}

impl Tables {
    fn next_student_id(&mut self) -> i32 {
        self.next_student_id += 1;
        self.next_student_id
    }

    fn next_enrollment_id(&mut self) -> i32 {
        self.next_enrollment_id += 1;
        self.next_enrollment_id
    }

    fn next_status_id(&mut self) -> i32 {
        self.next_status_id += 1;
        self.next_status_id
    }
}

impl RosterRepository for InMemoryRosterRepository {
    fn find_all_students(&self) -> Result<Vec<Student>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.students.clone())
    }

    fn find_student_by_id(&self, id: i32) -> Result<Option<Student>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .students
            .iter()
            .find(|student| student.id == Some(id))
            .cloned())
    }

    fn find_students_matching(
        &self,
        criteria: &StudentSearchCriteria,
    ) -> Result<Vec<Student>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .students
            .iter()
            .filter(|student| criteria.matches(student))
            .cloned()
            .collect())
    }

    fn find_all_enrollments(&self) -> Result<Vec<CourseEnrollment>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.enrollments.clone())
    }

    fn find_enrollments_by_student_id(
        &self,
        student_id: i32,
    ) -> Result<Vec<CourseEnrollment>, RepositoryError> {
        self.find_enrollments_by_student_ids(&[student_id])
    }

    fn find_enrollments_by_student_ids(
        &self,
        student_ids: &[i32],
    ) -> Result<Vec<CourseEnrollment>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .enrollments
            .iter()
            .filter(|enrollment| {
                enrollment
                    .student_id
                    .map(|id| student_ids.contains(&id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn insert_student(&self, student: &Student) -> Result<i32, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let id = tables.next_student_id();
        let mut row = student.clone();
        row.id = Some(id);
        tables.students.push(row);
        Ok(id)
    }

    fn update_student(&self, student: &Student) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        if let Some(row) = tables
            .students
            .iter_mut()
            .find(|row| row.id == student.id && student.id.is_some())
        {
            *row = student.clone();
        }
        Ok(())
    }

    fn insert_enrollment(&self, enrollment: &CourseEnrollment) -> Result<i32, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let id = tables.next_enrollment_id();
        let mut row = enrollment.clone();
        row.id = Some(id);
        // The status association lives in its own table.
        row.application_status = None;
        tables.enrollments.push(row);
        Ok(id)
    }

    fn update_enrollment(&self, enrollment: &CourseEnrollment) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        if let Some(row) = tables
            .enrollments
            .iter_mut()
            .find(|row| row.id == enrollment.id && enrollment.id.is_some())
        {
            row.course_name = enrollment.course_name.clone();
        }
        Ok(())
    }

    fn find_all_statuses(&self) -> Result<Vec<ApplicationStatus>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.statuses.clone())
    }

    fn find_status_by_enrollment_id(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<ApplicationStatus>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables
            .statuses
            .iter()
            .find(|status| status.course_id == Some(enrollment_id))
            .cloned())
    }

    fn insert_status(&self, status: &ApplicationStatus) -> Result<i32, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let id = tables.next_status_id();
        let mut row = status.clone();
        row.id = Some(id);
        tables.statuses.push(row);
        Ok(id)
    }

    fn update_status(&self, status: &ApplicationStatus) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        if let Some(row) = tables
            .statuses
            .iter_mut()
            .find(|row| row.id == status.id && status.id.is_some())
        {
            row.status = status.status.clone();
            row.updated_at = status.updated_at;
        }
        Ok(())
    }

    fn begin_transaction(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn commit_transaction(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn rollback_transaction(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
