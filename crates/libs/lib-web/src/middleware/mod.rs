//! # Middleware
//!
//! Axum middleware applied to every route.
//!
//! ## Modules
//!
//! - **[`mw_req_stamp`]**: Request ID and timestamp stamping
//! - **[`mw_logging`]**: Request/response logging

// region: --- Modules
pub mod mw_logging;
pub mod mw_req_stamp;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp, REQUEST_ID_HEADER};
// endregion: --- Re-exports
