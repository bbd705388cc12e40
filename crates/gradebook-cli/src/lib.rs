//! # Gradebook CLI
//!
//! Administrative tooling for Gradebook: database seeding and course reports.
//!
//! This library crate provides the functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use gradebook_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod report;
pub mod seeder;
