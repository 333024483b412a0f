use crate::api::{
    self,
    auth::{AuthGate, BearerTokenGate, NoopGate},
    password::{HashConfig, PasswordHashing},
    store::InMemoryStore,
    AppState,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_token: Option<SecretString>,
    pub hash: HashConfig,
}

/// Build the shared state from the parsed arguments.
///
/// # Errors
/// Returns an error if the password hashing parameters are invalid.
pub fn state(args: &Args) -> Result<AppState> {
    let hashing = PasswordHashing::new(args.hash).context("Invalid password hashing options")?;

    let gate: Arc<dyn AuthGate> = if let Some(token) = &args.api_token {
        info!("API token configured, bearer authentication enabled");
        Arc::new(BearerTokenGate::new(token.clone()))
    } else {
        warn!("No API token configured, requests are not authenticated");
        Arc::new(NoopGate)
    };

    Ok(AppState::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(hashing),
        gate,
    ))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let state = state(&args)?;

    api::new(args.port, state).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    #[test]
    fn state_without_token_admits_everything() {
        let state = state(&Args {
            port: 8080,
            api_token: None,
            hash: HashConfig::default(),
        })
        .unwrap();

        assert!(state.store.is_empty());
        assert!(state.gate.authorize(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn state_with_token_requires_it() {
        let state = state(&Args {
            port: 8080,
            api_token: Some(SecretString::from("s3cret".to_string())),
            hash: HashConfig::default(),
        })
        .unwrap();

        assert!(state.gate.authorize(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
        assert!(state.gate.authorize(&headers).is_ok());
    }

    #[test]
    fn invalid_hash_options_fail() {
        let result = state(&Args {
            port: 8080,
            api_token: None,
            hash: HashConfig {
                memory_kib: 1,
                iterations: 1,
                parallelism: 1,
            },
        });
        assert!(result.is_err());
    }
}
