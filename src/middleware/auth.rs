use crate::{
    auth::{verify_session_token, SESSION_COOKIE},
    error::AppError,
    state::AppState,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

/// Request guard for every protected route: pulls the session token out of
/// the `token` cookie, verifies it and attaches the acting user's id to the
/// request. Rejects with 401 before any handler runs. Never mutates state,
/// so retries pass through identically.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::Unauthenticated("No token, authorization denied".to_string()))?;

    let user_id = verify_session_token(&token, &state.config.jwt_secret)?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}

// Extractor for getting the authenticated user's id from request extensions
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Uuid>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthenticated("No token, authorization denied".to_string()))
    }
}
