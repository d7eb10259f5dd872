//! Process-wide tracing subscriber for the server binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::AppError;

/// Filter used when `RUST_LOG` is unset. Session rejections log at debug
/// and stay hidden unless the crate is raised explicitly.
pub const DEFAULT_FILTER: &str = "info,actix_web=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable multi-line output for local runs
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT=pretty` selects pretty output; anything else is JSON.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(false)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
    };

    installed.map_err(|e| AppError::config(format!("failed to install tracing subscriber: {e}")))
}
