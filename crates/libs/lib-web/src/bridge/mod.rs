//! # Realtime Bridge
//!
//! Bidirectional channel between the chat widget and the relay.
//!
//! Each WebSocket connection gets its own [`session`]: incoming
//! `sendMessage` events are handed to a [`ChatForwarder`] one at a time and
//! the answer (or a fixed failure notice) goes back to that connection only.
//!
//! ```text
//! widget ──ws──▶ session ──▶ ChatForwarder ──▶ relay (HTTP or in-process)
//!        ◀──ws── session ◀── answer / failure
//! ```

pub mod forwarder;
pub mod session;

pub use forwarder::{ChatForwarder, HttpForwarder};
pub use session::run_session;
