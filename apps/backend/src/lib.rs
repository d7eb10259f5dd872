#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use auth::claims::{Claims, Principal, Role};
pub use auth::identity::{AuthenticatedUser, Identity};
pub use auth::session_cookie::SessionCookies;
pub use auth::token::{TokenError, TokenService};
pub use config::server::ServerConfig;
pub use config::session::SessionConfig;
pub use error::AppError;
pub use middleware::cookie_auth::{resolve_identity, CookieAuth, CookieLookup, CookieSource};
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use services::principals::{InMemoryPrincipals, NewPrincipal, PrincipalStore};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
