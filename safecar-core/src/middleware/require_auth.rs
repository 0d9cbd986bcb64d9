//! Authentication enforcement middleware for REST API
//!
//! Protected route groups are wrapped in this layer so requests without a
//! valid bearer token never reach a handler.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::auth::{extract_bearer_token, AuthError};
use crate::jwt::JwtManager;

/// Shared state for authentication middleware
#[derive(Clone)]
pub struct AuthMiddlewareState {
    jwt_manager: JwtManager,
}

impl AuthMiddlewareState {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

/// Reject the request with 401 unless it carries a valid bearer token
pub async fn require_auth_middleware(
    State(auth_state): State<AuthMiddlewareState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token,
        Err(AuthError::MissingToken) => {
            return unauthorized_response("Missing authorization token")
        }
        Err(_) => return unauthorized_response("Authorization header must use Bearer scheme"),
    };

    if !auth_state.jwt_manager.validate_token(token) {
        return unauthorized_response("Invalid or expired token");
    }

    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}
