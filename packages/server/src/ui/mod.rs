//! UI layer: Axum router, WebSocket/HTTP handlers and shared state.

mod handler;
mod server;
mod signal;
mod state;

pub use server::{Server, ServerConfig};
pub use state::AppState;
