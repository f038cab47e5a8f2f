//! Authentication middleware for JWT token validation
//!
//! Every request passes through [`auth_middleware`]. Requests without an
//! `Authorization` header continue anonymously; a header that is present
//! but does not carry a valid access token is rejected with 401.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use common::token::TokenType;
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller
///
/// Handlers that require a login take `AuthUser`; handlers that only
/// personalise their answer take `Option<AuthUser>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Resolve the caller from a bearer access token, if one is sent
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.headers().contains_key(AUTHORIZATION) {
        let bearer = req
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .ok_or(ApiError::Unauthorized)?;

        let claims = state
            .verifier
            .verify_kind(bearer.token(), TokenType::Access)
            .map_err(|e| {
                warn!("Rejected access token: {}", e);
                ApiError::Unauthorized
            })?;

        req.extensions_mut().insert(AuthUser { id: claims.sub });
    }

    Ok(next.run(req).await)
}
