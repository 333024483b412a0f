//! End-to-end tests for the member API.
//!
//! These drive the public router the same way the server does, without
//! binding a socket:
//! 1. Register, view, change password and delete a member.
//! 2. Hammer the shared store from concurrent requests.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Datelike, Utc};
use memberd::api::{
    auth::NoopGate,
    password::{HashConfig, PasswordHashing},
    router,
    store::{InMemoryStore, MemberStore},
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestContext {
    store: Arc<InMemoryStore>,
    app: Router,
}

impl TestContext {
    fn new() -> Result<Self> {
        let store = Arc::new(InMemoryStore::new());
        let hashing = PasswordHashing::new(HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })?;

        let state = AppState::new(store.clone(), Arc::new(hashing), Arc::new(NoopGate));

        Ok(Self {
            store,
            app: router(state),
        })
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }
}

fn registration(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "name": "A",
        "date_of_birth": "2000-01-01",
        "gender": "F",
        "address": "X",
        "subscribed": true
    })
}

#[tokio::test]
async fn member_lifecycle() -> Result<()> {
    let ctx = TestContext::new()?;

    // 1. Register
    let (status, value) = ctx
        .request("POST", "/register", Some(registration("a@b.com", "pw1")))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["message"], "Registration successful");

    // 2. View, age derived from the birth date
    let (status, value) = ctx.request("GET", "/profile?email=a@b.com", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["name"], "A");
    assert_eq!(value["age"], json!(Utc::now().year() - 2000));
    assert!(value.get("password").is_none());

    let stored = ctx.store.get("a@b.com").expect("member stored");
    assert_ne!(stored.password, "pw1");

    // 3. Change password
    let (status, _) = ctx
        .request(
            "POST",
            "/change-password",
            Some(json!({
                "email": "a@b.com",
                "current_password": "pw1",
                "new_password": "pw2",
                "confirm_password": "pw2"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    // 4. Wrong current password
    let (status, value) = ctx
        .request(
            "POST",
            "/change-password",
            Some(json!({
                "email": "a@b.com",
                "current_password": "wrong",
                "new_password": "pw3",
                "confirm_password": "pw3"
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["error"], "Current password is incorrect");

    // 5. Edit
    let (status, value) = ctx
        .request(
            "PUT",
            "/profile?email=a@b.com",
            Some(json!({
                "date_of_birth": "1995-03-10",
                "gender": "X",
                "address": "Elsewhere",
                "subscribed": false
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["member"]["address"], "Elsewhere");
    assert_eq!(value["member"]["name"], "A");

    // 6. Delete, twice
    let (status, _) = ctx.request("DELETE", "/profile?email=a@b.com", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.request("DELETE", "/profile?email=a@b.com", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx.request("GET", "/profile?email=a@b.com", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(ctx.store.is_empty());

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_and_edits() -> Result<()> {
    let ctx = Arc::new(TestContext::new()?);

    let mut tasks = Vec::new();
    for i in 0..32 {
        let ctx = Arc::clone(&ctx);
        tasks.push(tokio::spawn(async move {
            let email = format!("user{i}@b.com");
            let (status, _) = ctx
                .request("POST", "/register", Some(registration(&email, "pw")))
                .await?;
            assert_eq!(status, StatusCode::OK);

            let (status, _) = ctx
                .request(
                    "PUT",
                    &format!("/profile?email={email}"),
                    Some(json!({
                        "date_of_birth": "1980-01-01",
                        "address": format!("street {i}"),
                        "subscribed": true
                    })),
                )
                .await?;
            assert_eq!(status, StatusCode::OK);
            anyhow::Ok(())
        }));
    }

    for task in tasks {
        task.await??;
    }

    assert_eq!(ctx.store.len(), 32);
    for i in 0..32 {
        let member = ctx
            .store
            .get(&format!("user{i}@b.com"))
            .expect("member stored");
        assert_eq!(member.address, format!("street {i}"));
    }

    Ok(())
}
