//! Student data models and DTOs.
//!
//! Re-exported from the `classroom-models` crate.

pub use classroom_models::students::*;
