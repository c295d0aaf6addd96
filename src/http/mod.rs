//! HTTP API and the embedded dashboard page

pub mod handler;
pub mod server;

pub use handler::{AppState, HttpError, HttpResult, SharedState};
pub use server::{build_router, HttpServer};
