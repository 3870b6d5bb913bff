//! Configuration for the NREL developer API.

use bon::Builder;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://developer.nrel.gov";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const API_KEY_VAR: &str = "NREL_API_KEY";
const EMAIL_VAR: &str = "NREL_API_EMAIL";
const BASE_URL_VAR: &str = "NREL_API_BASE_URL";

/// Credentials and endpoint settings for [`crate::NrelClient`].
///
/// # Examples
///
/// ```
/// use nrel_resource::NrelConfig;
/// use std::time::Duration;
///
/// let config = NrelConfig::builder()
///     .api_key("DEMO_KEY")
///     .email("someone@example.com")
///     .timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(config.base_url, "https://developer.nrel.gov");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct NrelConfig {
    #[builder(into)]
    pub api_key: Option<String>,
    #[builder(into)]
    pub email: Option<String>,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl NrelConfig {
    /// Reads `NREL_API_KEY`, `NREL_API_EMAIL` and `NREL_API_BASE_URL`.
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self::builder()
            .maybe_api_key(var(API_KEY_VAR))
            .maybe_email(var(EMAIL_VAR))
            .maybe_base_url(var(BASE_URL_VAR))
            .build()
    }
}

impl Default for NrelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
