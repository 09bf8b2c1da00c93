//! # Utilities Library
//!
//! Shared helpers for environment variables and input validation.

pub mod envs;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use validation::{validate_not_empty, validate_min};
