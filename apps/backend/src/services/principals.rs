//! Principal storage boundary.
//!
//! Persistent user storage lives outside this service; handlers depend only on
//! [`PrincipalStore`]. [`InMemoryPrincipals`] is the process-local store the
//! binary and the tests run against.

use std::collections::HashMap;

use actix_web::web;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::auth::claims::{Principal, Role};
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::logging::pii::Redacted;

pub const DEFAULT_PROFILE_IMAGE: &str = "/images/default.png";

/// Input for creating a principal at signup.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Create a principal with role `USER`. Fails with a conflict when the
    /// email is already registered.
    async fn register(&self, new: NewPrincipal) -> Result<Principal, AppError>;

    /// Return the principal when `password` matches the stored hash.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<Option<Principal>, AppError>;

    /// Full name given at signup, if the email is registered.
    async fn full_name(&self, email: &str) -> Result<Option<String>, AppError>;
}

/// Run argon2 work on the blocking pool so it does not stall the worker.
async fn off_worker<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    web::block(work)
        .await
        .map_err(|e| AppError::internal(format!("password task failed: {e}")))?
}

struct StoredPrincipal {
    principal: Principal,
    full_name: String,
    password_hash: String,
}

/// Principals kept in memory, keyed by lowercased email.
#[derive(Default)]
pub struct InMemoryPrincipals {
    by_email: RwLock<HashMap<String, StoredPrincipal>>,
}

impl InMemoryPrincipals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a principal with an explicit role, e.g. to seed an admin.
    /// Hashes inline; async callers go through [`PrincipalStore::register`].
    pub fn insert_with_role(&self, new: NewPrincipal, role: Role) -> Result<Principal, AppError> {
        let password_hash = hash_password(&new.password)?;
        self.insert_hashed(new, role, password_hash)
    }

    fn insert_hashed(
        &self,
        new: NewPrincipal,
        role: Role,
        password_hash: String,
    ) -> Result<Principal, AppError> {
        let key = normalize_email(&new.email);
        let mut by_email = self.by_email.write();
        if by_email.contains_key(&key) {
            return Err(AppError::conflict(
                "EMAIL_TAKEN",
                "An account with this email already exists",
            ));
        }

        let principal = Principal {
            subject_id: Uuid::new_v4().to_string(),
            email: new.email.trim().to_string(),
            profile_image_ref: DEFAULT_PROFILE_IMAGE.to_string(),
            role,
        };
        by_email.insert(
            key,
            StoredPrincipal {
                principal: principal.clone(),
                full_name: new.full_name,
                password_hash,
            },
        );

        info!(
            subject_id = %principal.subject_id,
            email = %Redacted(&principal.email),
            role = ?principal.role,
            "principal registered"
        );
        Ok(principal)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.by_email.read().len()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipals {
    async fn register(&self, new: NewPrincipal) -> Result<Principal, AppError> {
        let password = new.password.clone();
        let password_hash = off_worker(move || hash_password(&password)).await?;
        self.insert_hashed(new, Role::User, password_hash)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, AppError> {
        let stored = self
            .by_email
            .read()
            .get(&normalize_email(email))
            .map(|stored| (stored.principal.clone(), stored.password_hash.clone()));

        let Some((principal, password_hash)) = stored else {
            return Ok(None);
        };

        let password = password.to_string();
        let matches = off_worker(move || verify_password(&password, &password_hash)).await?;
        Ok(matches.then_some(principal))
    }

    async fn full_name(&self, email: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .by_email
            .read()
            .get(&normalize_email(email))
            .map(|stored| stored.full_name.clone()))
    }
}
