use secrecy::SecretString;

/// External-service settings shared by the server wiring.
#[derive(Clone)]
pub struct GlobalArgs {
    pub hibp_base_url: String,
    pub breach_base_url: String,
    pub breach_api_key: Option<SecretString>,
    pub http_timeout_seconds: u64,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(hibp_base_url: String, breach_base_url: String) -> Self {
        Self {
            hibp_base_url,
            breach_base_url,
            breach_api_key: None,
            http_timeout_seconds: 10,
        }
    }

    pub fn set_breach_api_key(&mut self, key: SecretString) {
        self.breach_api_key = Some(key);
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("hibp_base_url", &self.hibp_base_url)
            .field("breach_base_url", &self.breach_base_url)
            .field(
                "breach_api_key",
                &self.breach_api_key.as_ref().map(|_| "***"),
            )
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}
