//! # Core Library
//!
//! Configuration and the application-wide error type shared by every crate.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
