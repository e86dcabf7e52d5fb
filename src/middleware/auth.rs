use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::app_state::AppState;
use crate::auth;
use crate::error::AppError;

/// Gate for admin routes: a valid bearer token or a 401.
///
/// The handlers behind this layer only ever see authenticated requests;
/// they trust the gate and carry no auth logic of their own.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(AppError::Authentication("No token provided".to_string()));
    };

    let claims = auth::verify_token(state.env.auth.jwt_secret.expose_secret(), token)
        .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))?;

    debug!(subject = %claims.sub, "admin request authenticated");
    Ok(next.run(request).await)
}
