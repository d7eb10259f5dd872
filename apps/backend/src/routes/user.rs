use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::claims::{Principal, Role};
use crate::auth::identity::AuthenticatedUser;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::services::principals::NewPrincipal;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject_id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub profile_image_ref: String,
    pub role: Role,
    pub expires_at: i64,
}

/// Issue a credential for `principal` and redirect home with the cookie set.
fn start_session(state: &AppState, principal: &Principal) -> Result<HttpResponse, AppError> {
    let credential = state.tokens.issue(principal)?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(state.cookies.issue(credential))
        .finish())
}

async fn signup(
    form: web::Form<SignupForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let email = form.email.trim();

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request(
            "INVALID_EMAIL",
            "A valid email is required",
        ));
    }
    if form.password.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_PASSWORD",
            "Password cannot be empty",
        ));
    }

    let principal = state
        .principals
        .register(NewPrincipal {
            full_name: form.full_name.trim().to_string(),
            email: email.to_string(),
            password: form.password,
        })
        .await?;

    start_session(&state, &principal)
}

async fn signin(
    form: web::Form<SigninForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = form.email.trim();

    match state.principals.authenticate(email, &form.password).await? {
        Some(principal) => {
            info!(email = %Redacted(email), "signed in");
            start_session(&state, &principal)
        }
        None => {
            security::login_failed("invalid_credentials", email);
            Err(AppError::invalid_credentials())
        }
    }
}

async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(state.cookies.removal())
        .finish()
}

async fn me(
    AuthenticatedUser(claims): AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<web::Json<MeResponse>, AppError> {
    // Claims are authoritative; the store only adds the display name.
    let full_name = state.principals.full_name(&claims.email).await?;

    Ok(web::Json(MeResponse {
        subject_id: claims.subject_id,
        email: claims.email,
        full_name,
        profile_image_ref: claims.profile_image_ref,
        role: claims.role,
        expires_at: claims.expires_at,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/signin", web::post().to(signin))
        .route("/logout", web::get().to(logout))
        .route("/me", web::get().to(me));
}
