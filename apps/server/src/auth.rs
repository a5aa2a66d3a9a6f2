//! Bearer-token authentication.
//!
//! Tokens are opaque `{id}.{secret}` pairs. Only a SHA-256 digest of the
//! secret is persisted, so a database leak does not expose usable tokens,
//! and each token can be revoked individually (logout deletes exactly the
//! token that authenticated the request).

use std::sync::Arc;

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use nestfund_core::auth::{AuthTokenRepositoryTrait, NewAuthToken};
use nestfund_core::errors::{Error as CoreError, Result as CoreResult, ValidationError};
use nestfund_core::users::{User, UserRepositoryTrait};

use crate::main_lib::AppState;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthManager {
    users: Arc<dyn UserRepositoryTrait>,
    tokens: Arc<dyn AuthTokenRepositoryTrait>,
}

/// The authenticated caller, inserted as a request extension by
/// [`require_bearer`].
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token_id: String,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    status: &'static str,
    message: String,
}

fn secret_digest(secret: &str) -> String {
    BASE64.encode(Sha256::digest(secret.as_bytes()))
}

/// Compares the stored digest against the presented secret's digest in
/// time independent of where the strings first differ.
fn digest_matches(stored: &str, secret: &str) -> bool {
    let presented = secret_digest(secret);
    let (a, b) = (stored.as_bytes(), presented.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b)
        .fold(0u8, |diff, (x, y)| diff | (x ^ y))
        == 0
}

impl AuthManager {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        tokens: Arc<dyn AuthTokenRepositoryTrait>,
    ) -> Self {
        AuthManager { users, tokens }
    }

    /// Hashes a registration password, enforcing the minimum length first.
    pub fn hash_password(&self, password: &str) -> CoreResult<String> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "The password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::Unexpected(format!("Password hashing failed: {e}")))
    }

    /// Checks the credentials without revealing whether the email exists.
    pub fn authenticate(&self, email: &str, password: &str) -> CoreResult<User> {
        let Some(user) = self.users.find_by_email(email)? else {
            return Err(CoreError::InvalidCredentials);
        };
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| CoreError::Unexpected(format!("Stored password hash is invalid: {e}")))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|err| match err {
                PasswordHashError::Password => CoreError::InvalidCredentials,
                other => CoreError::Unexpected(format!("Password verification failed: {other}")),
            })?;
        Ok(user)
    }

    /// Issues a new bearer token for the user and returns it in plain form.
    pub async fn issue_token(&self, user: &User) -> CoreResult<String> {
        let token_id = Uuid::new_v4().to_string();
        let mut secret_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut secret_bytes);
        let secret = BASE64.encode(secret_bytes);

        self.tokens
            .insert_token(NewAuthToken {
                id: token_id.clone(),
                user_id: user.id.clone(),
                token_hash: secret_digest(&secret),
            })
            .await?;

        Ok(format!("{token_id}.{secret}"))
    }

    /// Resolves a presented bearer token to its user.
    pub fn verify_token(&self, token: &str) -> CoreResult<CurrentUser> {
        let Some((token_id, secret)) = token.split_once('.') else {
            return Err(CoreError::Unauthenticated);
        };
        let Some(stored) = self.tokens.find_token(token_id)? else {
            return Err(CoreError::Unauthenticated);
        };
        if !digest_matches(&stored.token_hash, secret) {
            return Err(CoreError::Unauthenticated);
        }
        let user = self.users.get_by_id(&stored.user_id)?;
        Ok(CurrentUser {
            user,
            token_id: stored.id,
        })
    }

    /// Deletes one token; other sessions of the same user stay valid.
    pub async fn revoke_token(&self, token_id: &str) -> CoreResult<()> {
        self.tokens.delete_token(token_id).await?;
        Ok(())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthenticated".to_string()),
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = Json(AuthErrorBody {
            status: "error",
            message,
        });
        (status, body).into_response()
    }
}

pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let current = state.auth.verify_token(token).map_err(|err| match err {
        CoreError::Unauthenticated => AuthError::Unauthorized,
        // A token pointing at a deleted user is just an invalid token.
        CoreError::Database(nestfund_core::errors::DatabaseError::NotFound(_)) => {
            AuthError::Unauthorized
        }
        other => AuthError::Internal(other.to_string()),
    })?;

    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}
