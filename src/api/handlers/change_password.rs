use super::{hash_password, verify_password, ErrorResponse, MessageResponse};
use crate::api::{error::ApiError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct ChangePasswordRequest {
    email: String,
    #[schema(value_type = String, format = Password)]
    current_password: SecretString,
    #[schema(value_type = String, format = Password)]
    new_password: SecretString,
    #[schema(value_type = String, format = Password)]
    confirm_password: SecretString,
}

#[utoipa::path(
    post,
    path = "/change-password",
    request_body = ChangePasswordRequest,
    responses (
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Body could not be parsed or new passwords differ", body = ErrorResponse),
        (status = 401, description = "Current password is incorrect", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
        (status = 500, description = "Password could not be hashed", body = ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, payload))]
pub async fn change_password(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::validation(e.body_text()))?;

    let member = state
        .store
        .get(&request.email)
        .ok_or(ApiError::NotFound)?;

    // A wrong current password wins over a new/confirm mismatch.
    let verified = verify_password(
        state.hashing.clone(),
        member.password.clone(),
        request.current_password,
    )
    .await?;
    if !verified {
        warn!(email = %request.email, "Password change with wrong current password");
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    if request.new_password.expose_secret() != request.confirm_password.expose_secret() {
        return Err(ApiError::validation(
            "New password and confirm password do not match",
        ));
    }

    let digest = hash_password(
        state.hashing.clone(),
        request.new_password,
        "Failed to hash new password",
    )
    .await?;

    // Only replace the digest that was verified above; if another change got
    // in first, the presented current password is no longer valid.
    let mut replaced = false;
    state
        .store
        .update(&request.email, &mut |stored| {
            if stored.password == member.password {
                stored.password.clone_from(&digest);
                replaced = true;
            }
        })
        .ok_or(ApiError::NotFound)?;

    if !replaced {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    info!(email = %request.email, "Password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::api::handlers::test_support::{app, send, state};
    use axum::http::StatusCode;
    use serde_json::json;

    fn registration() -> serde_json::Value {
        json!({
            "email": "a@b.com",
            "password": "pw1",
            "name": "A",
            "date_of_birth": "2000-01-01",
            "gender": "F",
            "address": "X",
            "subscribed": true
        })
    }

    fn change(current: &str, new: &str, confirm: &str) -> serde_json::Value {
        json!({
            "email": "a@b.com",
            "current_password": current,
            "new_password": new,
            "confirm_password": confirm
        })
    }

    #[tokio::test]
    async fn change_password_replaces_digest() {
        let state = state();
        let app = app(&state);
        send(&app, "POST", "/register", Some(registration())).await.unwrap();

        let (status, value) = send(
            &app,
            "POST",
            "/change-password",
            Some(change("pw1", "pw2", "pw2")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["message"], "Password changed successfully");

        let stored = state.store.get("a@b.com").unwrap();
        assert!(state.hashing.verify(&stored.password, "pw2"));
        assert!(!state.hashing.verify(&stored.password, "pw1"));

        // The old password no longer works.
        let (status, _) = send(
            &app,
            "POST",
            "/change-password",
            Some(change("pw1", "pw3", "pw3")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_current_password_is_unauthorized_even_on_mismatch() {
        let state = state();
        let app = app(&state);
        send(&app, "POST", "/register", Some(registration())).await.unwrap();
        let before = state.store.get("a@b.com").unwrap();

        for body in [change("wrong", "pw2", "pw2"), change("wrong", "pw2", "pw3")] {
            let (status, value) = send(&app, "POST", "/change-password", Some(body))
                .await
                .unwrap();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(value["error"], "Current password is incorrect");
        }

        assert_eq!(state.store.get("a@b.com").unwrap(), before);
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_rejected() {
        let state = state();
        let app = app(&state);
        send(&app, "POST", "/register", Some(registration())).await.unwrap();
        let before = state.store.get("a@b.com").unwrap();

        let (status, value) = send(
            &app,
            "POST",
            "/change-password",
            Some(change("pw1", "pw2", "pw3")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            value["error"],
            "New password and confirm password do not match"
        );
        assert_eq!(state.store.get("a@b.com").unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let state = state();
        let app = app(&state);

        let (status, _) = send(
            &app,
            "POST",
            "/change-password",
            Some(change("pw1", "pw2", "pw2")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn request_debug_redacts_passwords() {
        let request: super::ChangePasswordRequest =
            serde_json::from_value(change("pw1-secret", "pw2-secret", "pw2-secret")).unwrap();
        let rendered = format!("{request:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("pw1-secret"));
        assert!(!rendered.contains("pw2-secret"));
    }

    #[tokio::test]
    async fn unparseable_body_is_rejected() {
        let state = state();
        let app = app(&state);

        let (status, _) = send(
            &app,
            "POST",
            "/change-password",
            Some(json!({ "email": "a@b.com" })),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
