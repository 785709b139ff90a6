use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use super::domain::{Identity, IdentityId, Role};
use super::repository::IdentityRepository;
use crate::store::StoreError;

/// Header naming the caller. Stands in for the session cookie of a full
/// deployment; an upstream gateway is expected to have verified it.
pub const IDENTITY_HEADER: &str = "x-identity-id";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid identity header")]
    InvalidHeader,
    #[error("unknown identity")]
    UnknownIdentity,
    #[error("{0} access required")]
    Forbidden(Role),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidHeader | AuthError::UnknownIdentity => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Resolves the calling identity from request headers.
///
/// This is the only place roles are checked; services past this point trust
/// the [`Identity`] they are handed and only perform ownership checks.
pub struct Guard {
    identities: Arc<dyn IdentityRepository>,
}

impl Guard {
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }

    /// Caller must be signed in; any role is acceptable.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let raw = headers
            .get(IDENTITY_HEADER)
            .ok_or(AuthError::Unauthenticated)?;
        let id = raw
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or(AuthError::InvalidHeader)?;
        self.identities
            .find_identity(IdentityId(id))?
            .ok_or(AuthError::UnknownIdentity)
    }

    /// Caller must be signed in and hold `role` exactly.
    pub fn require(&self, headers: &HeaderMap, role: Role) -> Result<Identity, AuthError> {
        let identity = self.authenticate(headers)?;
        if identity.role != role {
            return Err(AuthError::Forbidden(role));
        }
        Ok(identity)
    }

    /// Anonymous access allowed; a present but broken header is still an error.
    pub fn optional(&self, headers: &HeaderMap) -> Result<Option<Identity>, AuthError> {
        if !headers.contains_key(IDENTITY_HEADER) {
            return Ok(None);
        }
        self.authenticate(headers).map(Some)
    }
}
