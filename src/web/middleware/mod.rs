//! Middleware for the HTTP front door.

pub mod cors;

pub use cors::create_cors_layer;
