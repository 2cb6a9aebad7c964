//! HTTP API for Clipstream

pub mod routes;
pub mod server;
pub mod social;

pub use server::{build_state, create_router, run_server, AppState, SharedState};
