use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::Claims;
use crate::error::AppError;

/// Who the caller is, as resolved once per request by the `CookieAuth`
/// middleware.
///
/// `Authenticated` claims passed signature and expiry checks at the moment
/// the request entered the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(Claims),
}

impl Identity {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(claims) => Some(claims),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// Read the identity resolved for this request, if the middleware ran.
    pub fn from_req(req: &HttpRequest) -> Option<Identity> {
        req.extensions().get::<Identity>().cloned()
    }
}

impl From<Option<Claims>> for Identity {
    fn from(claims: Option<Claims>) -> Self {
        match claims {
            Some(claims) => Identity::Authenticated(claims),
            None => Identity::Anonymous,
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // A missing identity means the route is not wrapped in CookieAuth.
        ready(Identity::from_req(req).ok_or_else(|| {
            AppError::internal("identity not resolved: CookieAuth middleware is not mounted")
        }))
    }
}

/// Claims of an authenticated caller; anonymous callers get 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match Identity::from_req(req) {
            Some(Identity::Authenticated(claims)) => Ok(AuthenticatedUser(claims)),
            Some(Identity::Anonymous) => Err(AppError::unauthorized()),
            None => Err(AppError::internal(
                "identity not resolved: CookieAuth middleware is not mounted",
            )),
        };
        ready(result)
    }
}
