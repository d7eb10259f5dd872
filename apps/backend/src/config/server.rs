use crate::error::AppError;

/// Listener settings and the optional bootstrap admin account.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `(email, password)` of an admin principal created at startup
    pub admin_seed: Option<(String, String)>,
}

impl ServerConfig {
    /// Load from `HOST` (default `0.0.0.0`), `PORT` (default `9000`) and the
    /// optional `ADMIN_EMAIL` / `ADMIN_PASSWORD` pair.
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            Err(_) => 9000,
        };

        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            (Err(_), Err(_)) => None,
            _ => {
                return Err(AppError::config(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together",
                ));
            }
        };

        Ok(Self {
            host,
            port,
            admin_seed,
        })
    }
}
