//! # Web Library
//!
//! HTTP handlers, the realtime bridge, middleware, and the relay service.
//!
//! ## Endpoints
//!
//! | Method | Path          | Purpose                                   |
//! |--------|---------------|-------------------------------------------|
//! | POST   | `/api/chat`   | one message in, one assistant answer out  |
//! | POST   | `/api/upload` | multipart file → remote file id           |
//! | GET    | `/api/ws`     | realtime channel (non-production only)    |
//! | GET    | `/health`     | liveness                                  |
//!
//! ```bash
//! curl -X POST http://127.0.0.1:3000/api/chat \
//!   -H 'Content-Type: application/json' \
//!   -d '{"message":"What is 6 x 7?"}'
//! ```

pub mod bridge;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
