//! Common utilities shared across the workspace.
//!
//! This crate provides unified error handling: domain errors keep their stable
//! codes and are mapped onto HTTP responses.

pub mod error;

pub use error::{AppError, AppResult};
