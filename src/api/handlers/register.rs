use super::{hash_password, ErrorResponse, MemberResponse};
use crate::api::{
    error::ApiError,
    member::{deserialize_date, Member},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use chrono::NaiveDate;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct RegisterRequest {
    email: String,
    #[schema(value_type = String, format = Password)]
    password: SecretString,
    name: String,
    #[serde(deserialize_with = "deserialize_date")]
    #[schema(value_type = String, format = Date, example = "2000-01-01")]
    date_of_birth: NaiveDate,
    #[serde(default)]
    gender: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    subscribed: bool,
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses (
        (status = 200, description = "Registration successful", body = MemberResponse, content_type = "application/json"),
        (status = 400, description = "Body could not be parsed into a member", body = ErrorResponse),
        (status = 500, description = "Password could not be hashed", body = ErrorResponse),
    ),
    tag = "members"
)]
// axum handler for register
#[instrument(skip(state, payload))]
pub async fn register(
    Extension(state): Extension<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MemberResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::validation(e.body_text()))?;

    if request.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }

    let password = hash_password(
        state.hashing.clone(),
        request.password,
        "Failed to hash password",
    )
    .await?;

    let member = Member {
        email: request.email,
        password,
        name: request.name,
        date_of_birth: request.date_of_birth,
        gender: request.gender,
        address: request.address,
        subscribed: request.subscribed,
    };
    let profile = member.profile();

    // Registering an existing email replaces the record.
    if state.store.put(member).is_some() {
        warn!(email = %profile.email, "Replaced existing member");
    } else {
        info!(email = %profile.email, "Member registered");
    }

    Ok(Json(MemberResponse {
        message: "Registration successful".to_string(),
        member: profile,
    }))
}
