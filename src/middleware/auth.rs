// ABOUTME: Admin authentication middleware guarding every /admin route
// ABOUTME: Accepts a static bearer token or an HS256 JWT whose role claim is admin or super_admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! # Admin Authentication
//!
//! Requests must carry `Authorization: Bearer <token>`. Depending on
//! configuration the token is either compared with a static admin token or
//! decoded as an HS256 JWT. A successful check inserts an [`AdminPrincipal`]
//! into the request extensions; handlers use it to attribute operation log
//! entries.
//!
//! | Failure | Status |
//! |---|---|
//! | header missing or not `Bearer` | 401 |
//! | token does not match / fails to decode | 401 |
//! | JWT role is not `admin` or `super_admin` | 403 |

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::config::{AuthConfig, AuthMode};
use crate::constants::{operation_log, roles};
use crate::errors::{AppError, AppResult};

/// Claims carried by admin JWTs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Subject user id
    pub user_id: String,
    /// Display name
    #[serde(default)]
    pub username: String,
    /// Role code, must be `admin` or `super_admin`
    pub role: String,
    /// Expiry as a unix timestamp
    pub exp: u64,
}

/// The authenticated caller of an admin request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    /// User id from the JWT, absent for the static token
    pub user_id: Option<String>,
    /// Display name
    pub username: String,
    /// Role code
    pub role: String,
}

impl AdminPrincipal {
    /// Principal used for requests authenticated by the static token
    #[must_use]
    pub fn static_token() -> Self {
        Self {
            user_id: None,
            username: operation_log::STATIC_TOKEN_ACTOR.to_owned(),
            role: roles::ADMIN.to_owned(),
        }
    }
}

/// Configured admin authentication strategy
#[derive(Clone)]
pub enum AdminAuth {
    /// Compare the bearer token with a literal
    StaticToken(Arc<str>),
    /// Decode the bearer token as an HS256 JWT
    Jwt(Arc<DecodingKey>),
}

impl AdminAuth {
    /// Build the strategy selected by configuration
    ///
    /// # Errors
    ///
    /// Returns a config error when JWT mode is selected without a secret
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        match config.mode {
            AuthMode::Static => Ok(Self::StaticToken(Arc::from(config.static_token.as_str()))),
            AuthMode::Jwt => {
                let secret = config
                    .jwt_secret
                    .as_deref()
                    .ok_or_else(|| AppError::config("JWT_SECRET is required in jwt mode"))?;
                Ok(Self::Jwt(Arc::new(DecodingKey::from_secret(
                    secret.as_bytes(),
                ))))
            }
        }
    }

    /// Validate a raw `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns 401 errors for missing or invalid credentials and 403 for a
    /// JWT whose role is not an admin role
    pub fn authenticate(&self, header: Option<&str>) -> AppResult<AdminPrincipal> {
        let header = header
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AppError::auth_required("Missing authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::auth_required("Malformed authorization header"))?;

        match self {
            Self::StaticToken(expected) => {
                // Constant-time comparison to prevent timing attacks
                if token.as_bytes().ct_eq(expected.as_bytes()).into() {
                    Ok(AdminPrincipal::static_token())
                } else {
                    Err(AppError::auth_invalid("Invalid admin token"))
                }
            }
            Self::Jwt(key) => {
                let claims = decode::<AdminClaims>(token, key, &Validation::new(Algorithm::HS256))
                    .map_err(|e| match e.kind() {
                        ErrorKind::ExpiredSignature => AppError::auth_invalid("Token has expired"),
                        _ => AppError::auth_invalid("Invalid token"),
                    })?
                    .claims;

                if claims.role != roles::ADMIN && claims.role != roles::SUPER_ADMIN {
                    return Err(AppError::permission_denied(
                        "Access denied: Admin or Super Admin role required",
                    ));
                }

                Ok(AdminPrincipal {
                    user_id: Some(claims.user_id),
                    username: claims.username,
                    role: claims.role,
                })
            }
        }
    }
}

/// Axum middleware that authenticates admin requests
///
/// # Errors
///
/// Returns the authentication failure, rendered as the error envelope
pub async fn admin_auth_middleware(
    State(auth): State<AdminAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let principal = auth.authenticate(header).inspect_err(|e| {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            error = %e,
            "Admin authentication failed"
        );
    })?;

    debug!(username = %principal.username, role = %principal.role, "Admin authenticated");
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
