use std::collections::HashMap;

use super::domain::{ApplicationStatus, CourseEnrollment, Student, StudentDetail};

/// Joins flat student, enrollment, and status records into one
/// [`StudentDetail`] per student, preserving student input order.
///
/// Status association is enrollment-scoped: each enrollment picks up the
/// status whose `course_id` equals the enrollment's own id. Enrollments whose
/// `student_id` matches no input student are dropped without error.
pub fn assemble_student_details(
    students: Vec<Student>,
    enrollments: Vec<CourseEnrollment>,
    statuses: Vec<ApplicationStatus>,
) -> Vec<StudentDetail> {
    let status_index = status_index(statuses);

    students
        .into_iter()
        .map(|student| {
            let courses = student
                .id
                .map(|student_id| {
                    enrollments
                        .iter()
                        .filter(|enrollment| enrollment.student_id == Some(student_id))
                        .cloned()
                        .map(|enrollment| attach_status(enrollment, &status_index))
                        .collect()
                })
                .unwrap_or_default();

            StudentDetail { student, courses }
        })
        .collect()
}

/// Folds the status list into an enrollment-id index.
///
/// Duplicate `course_id` entries keep the first-encountered status; later
/// duplicates are data anomalies, not updates. Statuses without a `course_id`
/// cannot be associated and are skipped.
fn status_index(statuses: Vec<ApplicationStatus>) -> HashMap<i32, ApplicationStatus> {
    statuses
        .into_iter()
        .fold(HashMap::new(), |mut index, status| {
            if let Some(course_id) = status.course_id {
                index.entry(course_id).or_insert(status);
            }
            index
        })
}

fn attach_status(
    mut enrollment: CourseEnrollment,
    status_index: &HashMap<i32, ApplicationStatus>,
) -> CourseEnrollment {
    if let Some(enrollment_id) = enrollment.id {
        if let Some(status) = status_index.get(&enrollment_id) {
            enrollment.application_status = Some(status.clone());
        }
    }
    enrollment
}
