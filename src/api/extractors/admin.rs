use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::state::AppState;
use crate::error::AppError;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{warn, Span};

/// Hex SHA-256 of an admin token. Only the digest is kept in memory.
pub fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Guard for `/api/admin/*`. Expects `Authorization: Bearer <ADMIN_TOKEN>`.
pub struct AdminUser;

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let expected = app_state.admin_token_hash.as_deref()
            .ok_or(AppError::Unauthorized)?;

        let presented = parts.headers.get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        if digest_token(presented) != expected {
            warn!("Rejected admin request with a bad token");
            return Err(AppError::Unauthorized);
        }

        Span::current().record("admin", true);
        Ok(AdminUser)
    }
}
