//! Authentication: registration, login, stateless session tokens.
//!
//! Passwords are hashed with Argon2. Sessions are HS256 JWTs carrying the
//! user id and role, signed with the secret from config — there is no
//! server-side session store. Every resource handler takes the `User`
//! extractor as an argument, so no route can skip the authorization check.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::db::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, User, UserResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_password, validate_required};

/// Token issuer claim
const ISSUER: &str = "rentr";

/// JWT claims for a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user id
    pub sub: String,
    /// User role at issue time
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// Errors that can occur verifying a session token
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("session token has expired")]
    Expired,

    #[error("session token is invalid")]
    Invalid,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Sign a session token for a user
pub fn issue_token(
    user_id: &str,
    role: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
        iss: ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

/// Extract the bearer token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Extractor for the current authenticated user. Verifies the token
/// signature and expiry, then loads the user row - a token for a deleted
/// account is rejected like any other invalid token.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = verify_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        let user = User::find_by_id(&state.db, &claims.sub)
            .await
            .map_err(ApiError::from)?;

        user.ok_or_else(|| ApiError::unauthorized("Session token is invalid"))
    }
}

fn validate_register_request(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&req.password) {
        errors.add("password", e);
    }
    if let Err(e) = validate_required(&req.name, "Name") {
        errors.add("name", e);
    }

    errors.finish()
}

/// Register a new user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_register_request(&req)?;

    // Emails are stored lowercased; uniqueness is case-insensitive
    let email = req.email.trim().to_lowercase();

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::conflict("A user with this email already exists"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to create user")
    })?;

    let user = User::create(&state.db, &email, &password_hash, req.name.trim()).await?;

    tracing::info!("Registered user {}", user.email);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login endpoint. Unknown email and wrong password are the same outcome,
/// so credential probing learns nothing.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &email).await?;

    let user = match user {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        _ => return Err(ApiError::unauthorized("Invalid credentials")),
    };

    let token = issue_token(
        &user.id,
        &user.role,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to sign session token: {}", e);
        ApiError::internal("Failed to sign session token")
    })?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Get the current user's profile
pub async fn me(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Update the current user's profile
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Err(e) = validate_required(&req.name, "Name") {
        return Err(ApiError::validation_field("name", e));
    }

    let updated = User::update_profile(&state.db, &user.id, req.name.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(updated)))
}
