use crate::{
    auth::{
        auth_dto::{AuthResponse, LoginRequest, SignupRequest},
        hash_password, issue_session_token, verify_password, SESSION_COOKIE, SESSION_TTL_DAYS,
    },
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    user::UserResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate email")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Emails are stored lowercased so uniqueness is case-insensitive
    let email = payload.email.to_lowercase();

    if state.user_repository.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "Duplicate email. User already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = state
        .user_repository
        .create(&payload.username, &email, &password_hash)
        .await
        .map_err(|e| {
            // Pre-check above can race a concurrent signup; the unique index
            // is the real arbiter
            if e.to_string().contains("duplicate key") {
                AppError::Conflict("Duplicate email. User already exists".to_string())
            } else {
                e
            }
        })?;

    let token = issue_session_token(user.id, &state.config.jwt_secret)?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_repository
        .find_by_email(&payload.email.to_lowercase())
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let token = issue_session_token(user.id, &state.config.jwt_secret)?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out")
    ),
    tag = "auth"
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Json(json!({ "message": "Logged out" })))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "User not found")
    ),
    tag = "auth",
    security(("session_cookie" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Get a user's public profile by id
#[utoipa::path(
    get,
    path = "/api/auth/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "User not found")
    ),
    tag = "auth",
    security(("session_cookie" = []))
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
