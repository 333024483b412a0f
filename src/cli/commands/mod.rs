pub mod hashing;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_API_TOKEN: &str = "api-token";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("memberd")
        .about("Member account service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("MEMBERD_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_API_TOKEN)
                .long("api-token")
                .help("Require `Authorization: Bearer <token>` on member routes")
                .long_help(
                    "Shared API token. When set, every request except /health must carry \
                     `Authorization: Bearer <token>`. When unset, requests are not authenticated.",
                )
                .env("MEMBERD_API_TOKEN")
                .hide_env_values(true),
        );

    let command = hashing::with_args(command);
    logging::with_args(command)
}
