use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use tracing::warn;

use super::auth::AuthUser;
use crate::auth::{guard, AuthError};
use crate::error::ApiError;
use crate::state::AppState;

/// Reject the request unless the authenticated caller holds `permission`.
/// Must run after `jwt_auth_middleware`.
pub async fn require_permission(
    permission: &'static str,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::HeaderMissing)?;

    if let Err(e) = guard::require(permission, &user.permissions) {
        warn!(
            subject = user.subject.as_deref().unwrap_or("-"),
            "Denied {} {}: {}",
            request.method(),
            request.uri().path(),
            e
        );
        return Err(e.into());
    }

    Ok(next.run(request).await)
}

/// Guard every method of `route` with `permission`
pub fn guarded(route: MethodRouter<AppState>, permission: &'static str) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn(move |request: Request, next: Next| {
        require_permission(permission, request, next)
    }))
}
