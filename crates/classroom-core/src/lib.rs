//! # Classroom Core
//!
//! Core types, errors, and utilities for the Classroom API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`messages`]: Client-facing messages shared by services and the storage layer
//! - [`storage`]: Classification of database errors into client-facing categories
//! - [`pagination`]: Page options and page metadata
//! - [`serde`]: Custom serde helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use classroom_core::{AppError, PageOptions, Page};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Teacher by id not found"));
//!
//! let options = PageOptions::default();
//! assert_eq!(options.skip(), 0);
//! ```

pub mod errors;
pub mod messages;
pub mod pagination;
pub mod serde;
pub mod storage;

pub use errors::AppError;
pub use pagination::{Order, Page, PageMeta, PageOptions};
pub use storage::StorageErrorKind;
