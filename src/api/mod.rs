//! API module
//!
//! HTTP surface of the transport adapter.

pub mod routes;

pub use routes::{create_router, AppState};
