//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the
//! appropriate action, such as starting the API server with its full
//! configuration state.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::services;
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches.get_one::<String>("dsn").cloned();
    let code_ttl_seconds = matches
        .get_one::<i64>("code-ttl-seconds")
        .copied()
        .unwrap_or(crate::verification::DEFAULT_CODE_TTL_SECONDS);
    let frontend_base_url = matches
        .get_one::<String>("frontend-base-url")
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    let hibp_base_url = matches
        .get_one::<String>(services::ARG_HIBP_BASE_URL)
        .cloned()
        .unwrap_or_else(|| crate::risk::hibp::DEFAULT_RANGE_BASE_URL.to_string());
    let breach_base_url = matches
        .get_one::<String>(services::ARG_BREACH_BASE_URL)
        .cloned()
        .unwrap_or_else(|| crate::breach::DEFAULT_BREACH_BASE_URL.to_string());
    let breach_api_key = matches
        .get_one::<String>(services::ARG_BREACH_API_KEY)
        .cloned();
    let http_timeout_seconds = matches
        .get_one::<u64>(services::ARG_HTTP_TIMEOUT_SECONDS)
        .copied()
        .unwrap_or(10);

    Ok(Action::Server(Args {
        port,
        dsn,
        code_ttl_seconds,
        frontend_base_url,
        hibp_base_url,
        breach_base_url,
        breach_api_key,
        http_timeout_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::actions::Action;

    #[test]
    fn handler_applies_defaults() {
        temp_env::with_vars(
            [
                ("FORTIFY_PORT", None::<&str>),
                ("FORTIFY_DSN", None),
                ("FORTIFY_CODE_TTL_SECONDS", None),
                ("FORTIFY_BREACH_API_KEY", None),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["fortify"]);
                let action = handler(&matches).expect("handler");

                let Action::Server(args) = action;
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, None);
                assert_eq!(args.code_ttl_seconds, 60);
                assert_eq!(args.hibp_base_url, "https://api.pwnedpasswords.com");
                assert_eq!(args.breach_api_key, None);
                assert_eq!(args.http_timeout_seconds, 10);
            },
        );
    }

    #[test]
    fn handler_picks_up_overrides() {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(vec![
            "fortify",
            "--port",
            "9090",
            "--code-ttl-seconds",
            "300",
            "--hibp-base-url",
            "https://range.example.com",
            "--breach-api-key",
            "hush",
        ]);
        let Action::Server(args) = handler(&matches).expect("handler");

        assert_eq!(args.port, 9090);
        assert_eq!(args.code_ttl_seconds, 300);
        assert_eq!(args.hibp_base_url, "https://range.example.com");
        assert_eq!(args.breach_api_key.as_deref(), Some("hush"));
    }
}
