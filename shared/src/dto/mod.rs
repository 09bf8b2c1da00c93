//! # Data Transfer Objects
//!
//! Request, response and event types exchanged with the chat widget.

pub mod chat;
pub mod realtime;
pub mod upload;

pub use chat::*;
pub use realtime::*;
pub use upload::*;
