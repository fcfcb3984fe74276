//! # Classroom CLI
//!
//! Database seeding utilities for Classroom API testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use classroom_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(20, 200).with_classes(10, 15);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
