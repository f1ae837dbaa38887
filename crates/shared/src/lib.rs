//! Shared types, errors, and configuration for Casal.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Remote revision numbers
//! - Application-wide error types
//! - Configuration management
//! - Tracing bootstrap

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
