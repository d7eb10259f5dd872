pub mod cookie_auth;
pub mod request_trace;
pub mod structured_logger;

pub use cookie_auth::{CookieAuth, CookieLookup, CookieSource};
pub use request_trace::{RequestId, RequestTrace};
pub use structured_logger::StructuredLogger;
