//! External-service arguments: range endpoint, breach endpoint, timeouts.

use clap::{Arg, Command};

pub const ARG_HIBP_BASE_URL: &str = "hibp-base-url";
pub const ARG_BREACH_BASE_URL: &str = "breach-base-url";
pub const ARG_BREACH_API_KEY: &str = "breach-api-key";
pub const ARG_HTTP_TIMEOUT_SECONDS: &str = "http-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_HIBP_BASE_URL)
                .long(ARG_HIBP_BASE_URL)
                .help("Base URL of the password range lookup service")
                .env("FORTIFY_HIBP_BASE_URL")
                .default_value(crate::risk::hibp::DEFAULT_RANGE_BASE_URL),
        )
        .arg(
            Arg::new(ARG_BREACH_BASE_URL)
                .long(ARG_BREACH_BASE_URL)
                .help("Base URL of the breached-account lookup service")
                .env("FORTIFY_BREACH_BASE_URL")
                .default_value(crate::breach::DEFAULT_BREACH_BASE_URL),
        )
        .arg(
            Arg::new(ARG_BREACH_API_KEY)
                .long(ARG_BREACH_API_KEY)
                .help("API key for the breached-account lookup service")
                .env("FORTIFY_BREACH_API_KEY"),
        )
        .arg(
            Arg::new(ARG_HTTP_TIMEOUT_SECONDS)
                .long(ARG_HTTP_TIMEOUT_SECONDS)
                .help("Timeout in seconds for outbound service calls")
                .env("FORTIFY_HTTP_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}
