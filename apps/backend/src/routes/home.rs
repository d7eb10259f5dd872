use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

use crate::auth::identity::Identity;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Landing page; the only thing it varies on is the caller's identity.
async fn home(identity: Identity) -> HttpResponse {
    let nav = match identity.claims() {
        Some(claims) => format!(
            r#"<p>Welcome, {}</p><a href="/user/logout">Logout</a>"#,
            escape_html(&claims.email)
        ),
        None => r#"<a href="/user/signin">Login</a> <a href="/user/signup">Create account</a>"#
            .to_string(),
    };

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            "<!doctype html><html><head><title>Blog</title></head><body><nav>{nav}</nav></body></html>"
        ))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));
}
