//! Tenant JWT authentication for the back-office API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// JWT claims for tenant authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantClaims {
    /// Tenant ID
    pub sub: String,
    /// Staff email
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated tenant identity extracted from JWT
#[derive(Debug, Clone)]
pub struct TenantIdentity {
    pub tenant_id: String,
    pub email: String,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a tenant user
pub fn create_token(
    tenant_id: &str,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = TenantClaims {
        sub: tenant_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a token, shared by the middleware and the KDS socket
pub fn verify_token(token: &str, secret: &str) -> Result<TenantIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<TenantClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    Ok(TenantIdentity {
        tenant_id: token_data.claims.sub,
        email: token_data.claims.email,
    })
}

/// Middleware that extracts and verifies tenant JWT from Authorization header
pub async fn tenant_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
                .into_response()
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::invalid_token("Invalid Authorization format").into_response()
    })?;

    let identity =
        verify_token(token, &state.jwt_secret).map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
