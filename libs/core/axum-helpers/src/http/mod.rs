//! Cross-cutting HTTP middleware.

pub mod cors;
pub mod security;

pub use cors::cors_layer;
pub use security::security_headers;
