// src/lib.rs

pub mod ai;
pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

// Entry points used by main and the integration tests.
pub use routes::create_router;
pub use store::Store;
