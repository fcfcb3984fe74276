//! # Classroom Models
//!
//! Domain models and DTOs for the Classroom API: persisted entities, the
//! request and response shapes, and the explicit conversions between them.
//!
//! # Modules
//!
//! - [`ids`]: typed `BIGINT` identifiers
//! - [`value_types`]: normalized `Email` and `ClassName`
//! - [`validation`]: custom `validator` rules
//! - [`teachers`], [`students`], [`classes`]: entities and DTOs
//!
//! # Example
//!
//! ```ignore
//! use classroom_models::teachers::{CreateTeacherDto, NewTeacher};
//!
//! let new_teacher = NewTeacher::try_from(dto)?;
//! assert_eq!(new_teacher.email.as_str(), new_teacher.email.as_str().to_lowercase());
//! ```

pub mod classes;
pub mod ids;
pub mod students;
pub mod teachers;
pub mod validation;
pub mod value_types;

pub use ids::{ClassId, StudentId, TeacherId};
pub use value_types::{ClassName, Email, ValueTypeError};
