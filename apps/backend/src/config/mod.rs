pub mod server;
pub mod session;

pub use server::ServerConfig;
pub use session::SessionConfig;
