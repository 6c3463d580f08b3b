use std::sync::{Mutex, PoisonError};

use actix_web::HttpRequest;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::ServiceError;

pub const ADMIN_SUBJECT: &str = "admin";
pub const PASSCODE_LENGTH: usize = 6;

// =============================================================================
// PASSCODE
// =============================================================================

/// Checks a candidate admin passcode.
pub trait PasscodeVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// Shared kiosk passcode kept only as an Argon2 hash.
pub struct Argon2Passcode {
    hash: String,
}

impl Argon2Passcode {
    pub fn new(passcode: &str) -> Result<Self, ServiceError> {
        if passcode.len() != PASSCODE_LENGTH || !passcode.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServiceError::ValidationError(format!(
                "Admin passcode must be exactly {} digits",
                PASSCODE_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(passcode.as_bytes(), &salt)
            .map_err(|e| ServiceError::InternalError(format!("Failed to hash passcode: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }
}

impl PasscodeVerifier for Argon2Passcode {
    fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!(error = %e, "Stored passcode hash is unreadable");
                false
            }
        }
    }
}

// =============================================================================
// ADMIN TOKENS
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued at
    pub jti: String, // Session id, revoked at logout
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn generate_token(
        &self,
        subject: &str,
        session_id: &str,
        expires_in: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();

        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + expires_in).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: session_id.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify_token(
        &self,
        token: &str,
    ) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64, // seconds
}

/// Bearer tokens for the admin panel. The kiosk has a single admin session:
/// issuing a token replaces the previous one and logout revokes it.
pub struct AdminTokens {
    jwt: JwtManager,
    ttl: Duration,
    active_session: Mutex<Option<String>>,
}

impl AdminTokens {
    pub fn new(jwt: JwtManager, ttl: Duration) -> Self {
        Self {
            jwt,
            ttl,
            active_session: Mutex::new(None),
        }
    }

    pub fn issue(&self) -> Result<IssuedToken, ServiceError> {
        let session_id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let token = self.jwt.generate_token(ADMIN_SUBJECT, &session_id, self.ttl)?;
        *self.session() = Some(session_id);

        tracing::info!("Admin session opened");
        Ok(IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    pub fn revoke(&self) {
        if self.session().take().is_some() {
            tracing::info!("Admin session closed");
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let claims = self
            .jwt
            .verify_token(token)
            .map_err(|_| ServiceError::AuthenticationError("Invalid token".to_string()))?
            .claims;

        match self.session().as_deref() {
            Some(active) if active == claims.jti => Ok(claims),
            _ => Err(ServiceError::AuthenticationError(
                "Admin session is no longer active".to_string(),
            )),
        }
    }

    fn session(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.active_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn extract_token_from_header(req: &HttpRequest) -> Option<String> {
    let auth_header = req
        .headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    // Handle case where token accidentally starts with "bearer " due to Swagger UI bug
    if auth_header.starts_with("bearer ") {
        Some(auth_header.strip_prefix("bearer ")?.to_string())
    } else {
        Some(auth_header.to_string())
    }
}
