//! # Memberd (Member Accounts)
//!
//! `memberd` is a small member-account service: registration, profile
//! view/edit/delete and password change over a JSON HTTP API.
//!
//! ## Storage
//!
//! Members live in an in-process store keyed by email. Nothing is persisted;
//! state is lost when the process exits. The store sits behind the
//! [`api::store::MemberStore`] trait so a durable backend can replace it
//! without touching the handlers.
//!
//! ## Passwords
//!
//! Passwords are hashed with **Argon2id** before they are stored. The digest
//! is never returned by the API.
//!
//! ## Authentication
//!
//! Every request passes through an [`api::auth::AuthGate`]. The default gate
//! admits everything; configuring an API token switches to a bearer-token gate.
//! There is no per-member authorization: any admitted caller may act on any
//! email.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
