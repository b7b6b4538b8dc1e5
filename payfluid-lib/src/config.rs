//! Client configuration and gateway endpoints.

use serde::{Deserialize, Serialize};

/// Gateway environment selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox environment for integration testing.
    #[default]
    Test,
    /// Production environment.
    Live,
}

impl Environment {
    /// Get the environment name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }

    /// Default API base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Test => "https://payfluid-api-test.anmgw.com",
            Self::Live => "https://payfluid-api.anmgw.com",
        }
    }
}

/// Configuration for the PayFluid client.
///
/// All authentication material is supplied by the caller at construction;
/// nothing is read from the process environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayFluidConfig {
    /// Merchant client id, sent base64-encoded in the `id` header.
    pub client_id: String,

    /// Pre-shared RSA public key material used to encrypt the
    /// authentication token for the credential request.
    pub api_key: String,

    /// Login parameter bound into the authentication token.
    pub login_parameter: String,

    /// Which gateway environment to talk to.
    #[serde(default)]
    pub environment: Environment,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Explicit base URL, overriding the environment preset.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl PayFluidConfig {
    /// Create a new configuration for the test environment.
    pub fn new(
        client_id: impl Into<String>,
        api_key: impl Into<String>,
        login_parameter: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: api_key.into(),
            login_parameter: login_parameter.into(),
            environment: Environment::default(),
            timeout_secs: default_timeout(),
            base_url: None,
        }
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Override the environment's base URL, e.g. to point at a local mock.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Effective API base URL.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url().trim_end_matches('/'), path)
    }

    /// URL of the secure-credentials endpoint.
    pub(crate) fn secure_credentials_url(&self) -> String {
        self.endpoint("secureCredentials")
    }

    /// URL of the payment-link endpoint.
    pub(crate) fn pay_link_url(&self) -> String {
        self.endpoint("getPayLink")
    }

    /// URL of the status endpoint.
    pub(crate) fn status_url(&self) -> String {
        self.endpoint("getStatus")
    }
}
