use crate::{api, cli::globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub code_ttl_seconds: i64,
    pub frontend_base_url: String,
    pub hibp_base_url: String,
    pub breach_base_url: String,
    pub breach_api_key: Option<String>,
    pub http_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database connection or the listener fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut globals = GlobalArgs::new(args.hibp_base_url, args.breach_base_url);
    globals.http_timeout_seconds = args.http_timeout_seconds;
    if let Some(key) = args.breach_api_key {
        globals.set_breach_api_key(SecretString::from(key));
    }

    debug!("Global args: {:?}", globals);

    api::new(
        args.port,
        args.dsn,
        &globals,
        args.code_ttl_seconds,
        &args.frontend_base_url,
    )
    .await
}
