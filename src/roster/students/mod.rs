//! Student roster administration: search, registration, and update of
//! students together with their course enrollments and application statuses.
//!
//! Reads flow storage -> aggregation (`converter`) -> caller; writes flow
//! caller -> reconciliation (`service`) -> storage. The two paths share only
//! the data model.

pub mod converter;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use converter::assemble_student_details;
pub use domain::{
    ApplicationStatus, ApplicationStatusKind, CourseEnrollment, Student, StudentDetail,
    StudentSearchCriteria,
};
pub use repository::{RepositoryError, RosterRepository};
pub use router::student_router;
pub use service::{ServiceError, StudentService};
pub use validation::{validate_registration, validate_update, ValidationError};
