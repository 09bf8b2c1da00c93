//! # Services Layer
//!
//! Business logic between the HTTP handlers and the assistant integration.
//!
//! ```text
//! Handlers (HTTP) / Realtime bridge → RelayService → AssistantAdapter / UploadAdapter → hosted API
//! ```
//!
//! Services hold their dependencies (adapters, directories) as fields and
//! return `Result<T, AppError>`; handlers decide how an error is shown.

pub mod relay;

pub use relay::RelayService;
