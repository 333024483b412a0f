//! Map validated CLI arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{hashing, ARG_API_TOKEN, ARG_PORT};
use anyhow::Result;
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    // An empty token would make every bearer header with no value valid.
    let api_token = matches
        .get_one::<String>(ARG_API_TOKEN)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .map(SecretString::from);

    let hash = hashing::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        api_token,
        hash,
    }))
}
