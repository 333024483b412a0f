use crate::api::{
    auth::AuthGate,
    handlers::{change_password, health, profile, register},
    password::PasswordHashing,
    store::MemberStore,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod auth;
pub mod error;
pub(crate) mod handlers;
pub mod member;
pub mod openapi;
pub mod password;
pub mod store;

pub use openapi::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything a handler needs, shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MemberStore>,
    pub hashing: Arc<PasswordHashing>,
    pub gate: Arc<dyn AuthGate>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn MemberStore>,
        hashing: Arc<PasswordHashing>,
        gate: Arc<dyn AuthGate>,
    ) -> Self {
        Self {
            store,
            hashing,
            gate,
        }
    }
}

/// Build the application router with its middleware stack.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/register", post(register::register))
        .route(
            "/profile",
            get(profile::view_profile)
                .put(profile::edit_profile)
                .delete(profile::delete_profile),
        )
        .route("/change-password", post(change_password::change_password))
        .merge(openapi::routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state))
                .layer(middleware::from_fn(auth::authenticate)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
