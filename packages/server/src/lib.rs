//! Idobata chat hub server library.
//!
//! Provides the connection/identity registry, message routing and bounded
//! per-conversation history behind an Axum WebSocket endpoint, plus the
//! avatar upload HTTP surface.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
