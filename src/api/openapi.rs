use super::handlers::{change_password, health, profile, register};
use axum::{routing::get, Json, Router};
use utoipa::{
    openapi::{Contact, License},
    OpenApi,
};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        register::register,
        profile::view_profile,
        profile::edit_profile,
        profile::delete_profile,
        change_password::change_password,
    ),
    tags(
        (name = "members", description = "Member registration and profile management"),
        (name = "health", description = "Service status"),
    )
)]
struct ApiDoc;

/// Build the `OpenAPI` document, with info taken from Cargo metadata.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();

    spec.info.title = env!("CARGO_PKG_NAME").to_string();
    spec.info.version = env!("CARGO_PKG_VERSION").to_string();
    spec.info.description = optional_str(env!("CARGO_PKG_DESCRIPTION")).map(str::to_string);
    spec.info.contact = cargo_contact();
    spec.info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });

    spec
}

/// Route serving the document.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(OPENAPI_PATH, get(|| async { Json(openapi()) }))
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    if let Some(start) = author.find('<') {
        let name = author[..start].trim();
        let email = author[start + 1..].trim_end_matches('>').trim();
        (
            Some(name).filter(|s| !s.is_empty()),
            Some(email).filter(|s| !s.is_empty()),
        )
    } else {
        (Some(author.trim()).filter(|s| !s.is_empty()), None)
    }
}
