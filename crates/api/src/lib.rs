//! HTTP API layer for Lectro.
//!
//! - **Endpoints**: sign-in, swap requests, notifications, timetables
//! - **Extractors**: authenticated identity and role checks
//! - **Middleware**: bearer token verification
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{health, router};
pub use middleware::{AppState, auth_middleware};
