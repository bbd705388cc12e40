//! # Gradebook Core
//!
//! Core types shared by every Gradebook crate.
//!
//! - [`errors`]: [`AppError`], the single error type returned by services and
//!   handlers, and its HTTP response conversion
//! - [`validation`]: helpers that turn `validator` failures into readable messages
//!
//! # Example
//!
//! ```ignore
//! use gradebook_core::AppError;
//!
//! let err = AppError::not_found(anyhow::anyhow!("Curso 7 not found"));
//! assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
//! ```

pub mod errors;
pub mod validation;

pub use errors::{AppError, ErrorResponse};
pub use validation::{format_validation_errors, validate_dto};
