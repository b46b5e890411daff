//! HTTP front door for Courier.
//!
//! Binds `/send` and `/host-email-image` to the mail and image components and
//! writes their envelopes back as JSON responses.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
