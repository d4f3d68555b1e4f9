// Presentation layer - HTTP routes, handlers and auth middleware
pub mod app_state;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
