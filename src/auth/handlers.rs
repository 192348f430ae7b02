use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        cookie::{expired_session_cookie, session_cookie},
        dto::{LoginRequest, RegisterRequest},
        error::{AuthError, MISSING_FIELDS},
        jwt::JwtKeys,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(register))
        .route("/auth/", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

/// A body that is absent, not JSON, or the wrong shape reads as if no fields were sent.
fn body_or_missing<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(status = %rejection.status(), error = %rejection.body_text(), "unreadable request body");
        AuthError::Validation(MISSING_FIELDS)
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap), AuthError> {
    let payload = body_or_missing(payload)?;
    let keys = JwtKeys::from_ref(&state);
    let token = services::register(state.users.as_ref(), &keys, payload).await?;
    Ok((StatusCode::OK, session_cookie(&token, state.config.cookie.secure)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap), AuthError> {
    let payload = body_or_missing(payload)?;
    let keys = JwtKeys::from_ref(&state);
    let token = services::login(state.users.as_ref(), &keys, payload).await?;
    Ok((StatusCode::OK, session_cookie(&token, state.config.cookie.secure)?))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<(StatusCode, HeaderMap), AuthError> {
    Ok((StatusCode::OK, expired_session_cookie(state.config.cookie.secure)?))
}
