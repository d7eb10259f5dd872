use actix_web::web;

pub mod health;
pub mod home;
pub mod user;

/// Register every route. Session resolution is not wired here: callers wrap
/// the app with `CookieAuth`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(home::configure_routes)
        .service(web::scope("/health").configure(health::configure_routes))
        .service(web::scope("/user").configure(user::configure_routes));
}
