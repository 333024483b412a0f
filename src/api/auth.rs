//! Request authentication gate.
//!
//! Every request is offered to the configured [`AuthGate`] before it reaches a
//! handler. [`NoopGate`] admits everything; [`BearerTokenGate`] requires a
//! shared API token.

use super::{error::ApiError, openapi::OPENAPI_PATH, AppState};
use axum::{
    extract::{Extension, Request},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::debug;

/// Paths that skip the gate.
const PUBLIC_PATHS: &[&str] = &["/health", OPENAPI_PATH];

pub trait AuthGate: Send + Sync {
    /// # Errors
    /// Returns `ApiError::Unauthorized` when the request must be rejected.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError>;
}

#[derive(Clone, Debug)]
pub struct NoopGate;

impl AuthGate for NoopGate {
    fn authorize(&self, _headers: &HeaderMap) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Accepts requests carrying `Authorization: Bearer <token>` for a fixed token.
#[derive(Debug)]
pub struct BearerTokenGate {
    token: SecretString,
}

impl BearerTokenGate {
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl AuthGate for BearerTokenGate {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
            .map(|(_, token)| token.trim())
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let expected = self.token.expose_secret().as_bytes();
        if bool::from(presented.as_bytes().ct_eq(expected)) {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Invalid bearer token"))
        }
    }
}

/// axum middleware running the configured gate.
pub async fn authenticate(
    Extension(state): Extension<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    match state.gate.authorize(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            debug!("Request rejected by auth gate: {}", err);
            err.into_response()
        }
    }
}
