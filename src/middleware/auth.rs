use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{AuthError, Claims, Permissions};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: Option<String>,
    pub permissions: Permissions,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        let permissions = claims.permission_set();
        Self {
            subject: claims.sub,
            permissions,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = extract_bearer_token(request.headers())
        .and_then(|token| state.keys.validate(token))
        .map_err(|e| {
            warn!("Rejected request to {}: {}", request.uri().path(), e);
            ApiError::unauthorized(e)
        })?;

    let auth_user = AuthUser::from(claims);
    debug!(
        subject = auth_user.subject.as_deref().unwrap_or("-"),
        permissions = auth_user.permissions.len(),
        "Authenticated request"
    );
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::HeaderMissing)?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(*token),
        [scheme] if scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::HeaderMalformed("Token not found"))
        }
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::HeaderMalformed("Authorization header must start with Bearer"))
        }
        _ => Err(AuthError::HeaderMalformed("Authorization header must be Bearer token")),
    }
}
