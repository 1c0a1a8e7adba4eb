use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::account::{AccountStore, NewAccount, StoreError};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (account id as string)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

impl Claims {
    /// The account id carried by the token.
    pub fn account_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidCredentials)
    }
}

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 30, message = "username must be 1 to 30 characters"))]
    #[schema(example = "user1")]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "user1@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(range(min = 18, message = "age must be at least 18"))]
    #[schema(example = 25)]
    pub age: i32,
    #[validate(length(max = 1000, message = "bio must be at most 1000 characters"))]
    #[schema(example = "Backend engineer")]
    pub bio: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "user1")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub account_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Username or email already exists")]
    Duplicate,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AuthError::Duplicate,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

pub struct UserAuthService {
    store: Arc<dyn AccountStore>,
    jwt_secret: String,
}

impl UserAuthService {
    pub fn new(store: Arc<dyn AccountStore>, jwt_secret: String) -> Self {
        Self { store, jwt_secret }
    }

    /// Register a new account; the password is stored as an Argon2 hash.
    pub async fn register(&self, req: RegisterRequest) -> Result<i64, AuthError> {
        req.validate().map_err(|e| {
            let msg = e
                .field_errors()
                .into_iter()
                .flat_map(|(_, errs)| errs.iter())
                .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| "Invalid input".to_string());
            AuthError::Validation(msg)
        })?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("Hashing failed: {}", e)))?
            .to_string();

        let id = self
            .store
            .create(NewAccount {
                username: req.username.clone(),
                email: req.email,
                password_hash,
                age: req.age,
                bio: req.bio,
            })
            .await?;

        tracing::info!(account_id = id, username = %req.username, "Account registered");
        Ok(id)
    }

    /// Login and issue a JWT valid for 24 hours.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let account = self
            .store
            .find_by_username(&req.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid hash format: {}", e)))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(24))
            .unwrap_or(now)
            .timestamp();

        let claims = Claims {
            sub: account.id.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(AuthResponse {
            token,
            account_id: account.id,
            username: account.username,
            email: account.email,
        })
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AuthError::InvalidCredentials)?;
        Ok(token_data.claims)
    }
}
