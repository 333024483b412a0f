//! Profile view, edit and delete, all addressed by `?email=`.

use super::{ErrorResponse, MemberResponse, MessageResponse};
use crate::api::{
    error::ApiError,
    member::{deserialize_date, MemberProfile},
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};

/// A missing `email` is treated like an unknown one.
#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    #[serde(default)]
    email: String,
}

/// Fields that may change through `PUT /profile`. Name and password are fixed.
#[derive(ToSchema, Deserialize, Debug)]
pub struct EditProfileRequest {
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

fn email_from(query: Result<Query<ProfileQuery>, QueryRejection>) -> Result<String, ApiError> {
    query
        .map(|Query(query)| query.email)
        .map_err(|e| ApiError::validation(e.body_text()))
}

#[utoipa::path(
    get,
    path = "/profile",
    params(ProfileQuery),
    responses (
        (status = 200, description = "Member profile with computed age", body = MemberProfile),
        (status = 404, description = "Member not found", body = ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, query))]
pub async fn view_profile(
    Extension(state): Extension<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Json<MemberProfile>, ApiError> {
    let email = email_from(query)?;
    let member = state.store.get(&email).ok_or(ApiError::NotFound)?;

    debug!(email = %email, "Profile viewed");

    Ok(Json(member.profile()))
}

#[utoipa::path(
    put,
    path = "/profile",
    params(ProfileQuery),
    request_body = EditProfileRequest,
    responses (
        (status = 200, description = "Profile updated", body = MemberResponse),
        (status = 400, description = "Body could not be parsed", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, query, payload))]
pub async fn edit_profile(
    Extension(state): Extension<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
    payload: Result<Json<EditProfileRequest>, JsonRejection>,
) -> Result<Json<MemberResponse>, ApiError> {
    let email = email_from(query)?;

    // Existence is checked before the body, so an unknown email is a 404
    // even when the body is malformed.
    if state.store.get(&email).is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(changes) = payload.map_err(|e| ApiError::validation(e.body_text()))?;

    let member = state
        .store
        .update(&email, &mut |member| {
            member.date_of_birth = changes.date_of_birth;
            member.gender.clone_from(&changes.gender);
            member.address.clone_from(&changes.address);
            member.subscribed = changes.subscribed;
        })
        .ok_or(ApiError::NotFound)?;

    info!(email = %email, "Profile updated");

    Ok(Json(MemberResponse {
        message: "Profile updated".to_string(),
        member: member.profile(),
    }))
}

#[utoipa::path(
    delete,
    path = "/profile",
    params(ProfileQuery),
    responses (
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
    ),
    tag = "members"
)]
#[instrument(skip(state, query))]
pub async fn delete_profile(
    Extension(state): Extension<AppState>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = email_from(query)?;
    state.store.remove(&email).ok_or(ApiError::NotFound)?;

    info!(email = %email, "Member deleted");

    Ok(Json(MessageResponse::new("Member deleted successfully")))
}
