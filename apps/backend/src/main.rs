use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use blog_backend::auth::claims::Role;
use blog_backend::config::server::ServerConfig;
use blog_backend::config::session::SessionConfig;
use blog_backend::middleware::cookie_auth::CookieAuth;
use blog_backend::middleware::request_trace::RequestTrace;
use blog_backend::middleware::structured_logger::StructuredLogger;
use blog_backend::routes;
use blog_backend::services::principals::{InMemoryPrincipals, NewPrincipal};
use blog_backend::state::app_state::AppState;
use blog_backend::telemetry::{self, LogFormat};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = telemetry::init_tracing(LogFormat::from_env()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    // A missing or malformed secret must stop the process before it serves
    // a single request.
    let session = match SessionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid session configuration");
            std::process::exit(1);
        }
    };
    let server = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };

    let principals = Arc::new(InMemoryPrincipals::new());
    if let Some((email, password)) = server.admin_seed.clone() {
        let seeded = principals.insert_with_role(
            NewPrincipal {
                full_name: "Administrator".to_string(),
                email,
                password,
            },
            Role::Admin,
        );
        if let Err(e) = seeded {
            error!(error = %e, "failed to seed admin principal");
            std::process::exit(1);
        }
    }

    let state = AppState::new(&session, principals);
    let tokens = state.tokens.clone();
    let cookie_name = state.cookie_name().to_string();
    let data = web::Data::new(state);

    info!(
        host = %server.host,
        port = server.port,
        cookie = %cookie_name,
        ttl_secs = session.ttl.whole_seconds(),
        "starting blog backend"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(CookieAuth::new(tokens.clone(), cookie_name.clone()))
            .wrap(RequestTrace)
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
