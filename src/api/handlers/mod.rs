//! API handlers and the helpers they share.

pub mod change_password;
pub mod health;
pub mod profile;
pub mod register;

use super::{error::ApiError, member::MemberProfile, password::PasswordHashing};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Success body carrying the affected member.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MemberResponse {
    pub message: String,
    pub member: MemberProfile,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every failed request.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Hash on the blocking pool; Argon2 is deliberately slow.
pub(crate) async fn hash_password(
    hashing: Arc<PasswordHashing>,
    password: SecretString,
    failure: &'static str,
) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hashing.hash(password.expose_secret()))
        .await
        .map_err(|e| ApiError::internal(failure, e))?
        .map_err(|e| ApiError::internal(failure, e))
}

pub(crate) async fn verify_password(
    hashing: Arc<PasswordHashing>,
    digest: String,
    candidate: SecretString,
) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || hashing.verify(&digest, candidate.expose_secret()))
        .await
        .map_err(|e| ApiError::internal("Failed to verify password", e))
}
