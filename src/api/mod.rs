//! Domain Appraiser HTTP API Module
//! REST front end over the estimator and its history

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
