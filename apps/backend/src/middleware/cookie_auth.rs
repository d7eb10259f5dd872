//! Session cookie authentication middleware
//!
//! Reads the session cookie, verifies the credential it carries and stores the
//! resulting [`Identity`] in request extensions. It is strictly fail-open:
//! missing, malformed, forged or expired credentials make the request
//! anonymous and never change the response.

use std::cell::Ref;
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::cookie::{Cookie, ParseError as CookieParseError};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::auth::identity::Identity;
use crate::auth::token::{TokenError, TokenService};
use crate::logging::security;

/// Outcome of looking up one named cookie on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieLookup {
    /// The request has no usable cookie collection (unparseable header).
    Unavailable,
    Missing,
    Present(String),
}

/// Capability to read named cookies from a request.
pub trait CookieSource {
    fn lookup_cookie(&self, name: &str) -> CookieLookup;
}

fn lookup_in(
    jar: Result<Ref<'_, Vec<Cookie<'static>>>, CookieParseError>,
    name: &str,
) -> CookieLookup {
    match jar {
        Ok(jar) => jar
            .iter()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| CookieLookup::Present(cookie.value().to_string()))
            .unwrap_or(CookieLookup::Missing),
        Err(_) => CookieLookup::Unavailable,
    }
}

impl CookieSource for ServiceRequest {
    fn lookup_cookie(&self, name: &str) -> CookieLookup {
        lookup_in(self.cookies(), name)
    }
}

impl CookieSource for HttpRequest {
    fn lookup_cookie(&self, name: &str) -> CookieLookup {
        lookup_in(self.cookies(), name)
    }
}

/// Resolve the caller's identity from `source`. Never fails.
pub fn resolve_identity<C>(source: &C, cookie_name: &str, tokens: &TokenService) -> Identity
where
    C: CookieSource + ?Sized,
{
    let credential = match source.lookup_cookie(cookie_name) {
        CookieLookup::Present(value) if !value.is_empty() => value,
        CookieLookup::Present(_) | CookieLookup::Missing => return Identity::Anonymous,
        CookieLookup::Unavailable => {
            debug!(cookie = cookie_name, "cookie header unparseable, treating as anonymous");
            return Identity::Anonymous;
        }
    };

    match tokens.verify(&credential) {
        Ok(claims) => Identity::Authenticated(claims),
        Err(err) => {
            security::session_rejected(match err {
                TokenError::Expired => "expired",
                TokenError::SignatureInvalid => "signature_invalid",
            });
            Identity::Anonymous
        }
    }
}

/// Middleware factory; wrap the app (or a scope) with it.
#[derive(Clone)]
pub struct CookieAuth {
    inner: Rc<CookieAuthInner>,
}

struct CookieAuthInner {
    tokens: TokenService,
    cookie_name: String,
}

impl CookieAuth {
    pub fn new(tokens: TokenService, cookie_name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(CookieAuthInner {
                tokens,
                cookie_name: cookie_name.into(),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CookieAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieAuthMiddleware {
            service,
            inner: Rc::clone(&self.inner),
        }))
    }
}

pub struct CookieAuthMiddleware<S> {
    service: S,
    inner: Rc<CookieAuthInner>,
}

impl<S, B> Service<ServiceRequest> for CookieAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The check runs once per request; an outer CookieAuth already decided.
        let already_checked = req.extensions().contains::<Identity>();
        if !already_checked {
            let identity = resolve_identity(&req, &self.inner.cookie_name, &self.inner.tokens);
            req.extensions_mut().insert(identity);
        }

        Box::pin(self.service.call(req))
    }
}
