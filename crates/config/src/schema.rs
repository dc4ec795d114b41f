use crate::credentials::Credentials;
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use zcreator_types::ZohoError;

fn default_accounts_url() -> String {
    "https://accounts.zoho.com".to_string()
}
fn default_api_domain() -> String {
    "https://www.zohoapis.com".to_string()
}
fn default_namespace() -> String {
    "bcxcrm".to_string()
}
fn default_refresh_margin_secs() -> u64 {
    300
}

/// Keys read from the environment as raw text. figment's `Env` would turn
/// `1000.5` or `0123` into numbers, which is wrong for an OAuth secret.
const STRING_KEYS: [&str; 7] = [
    "CLIENT_ID",
    "CLIENT_SECRET",
    "REFRESH_TOKEN",
    "ACCOUNTS_URL",
    "API_DOMAIN",
    "NAMESPACE",
    "REDIRECT_URI",
];

/// The variables `env` selects, as an unparsed string layer.
fn verbatim(env: &Env) -> Serialized<BTreeMap<String, String>> {
    Serialized::defaults(env.iter().map(|(k, v)| (k.as_str().to_string(), v)).collect())
}

/// Top-level client configuration.
///
/// Every key can also be supplied through the environment as `ZOHO_<KEY>`
/// (e.g. `ZOHO_CLIENT_ID`). The bare `REFRESH_TOKEN` and `API_DOMAIN`
/// variables are honoured as well, with the prefixed form winning.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Accounts service base URL (defaults to `https://accounts.zoho.com`).
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
    /// API base URL (defaults to `https://www.zohoapis.com`).
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// Creator application namespace under `/creator/custom/`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Seconds subtracted from the server-declared token lifetime.
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
    /// Only needed by the one-time authorization-code exchange.
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            accounts_url: default_accounts_url(),
            api_domain: default_api_domain(),
            namespace: default_namespace(),
            refresh_margin_secs: default_refresh_margin_secs(),
            redirect_uri: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("accounts_url", &self.accounts_url)
            .field("api_domain", &self.api_domain)
            .field("namespace", &self.namespace)
            .field("refresh_margin_secs", &self.refresh_margin_secs)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from defaults, an optional YAML file, then the
    /// environment (highest precedence).
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::Config`] if the file cannot be read or a value
    /// has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ZohoError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(verbatim(&Env::raw().only(&["REFRESH_TOKEN", "API_DOMAIN"])))
            .merge(Env::prefixed("ZOHO_").ignore(&STRING_KEYS))
            .merge(verbatim(&Env::prefixed("ZOHO_").only(&STRING_KEYS)))
            .extract()
            .map_err(|e| ZohoError::Config(e.to_string()))?;
        tracing::debug!(config = ?config, "configuration loaded");
        Ok(config)
    }

    #[must_use]
    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs)
    }

    /// Narrow the configuration to the immutable credential set.
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::MissingConfiguration`] listing every absent or
    /// empty key among `client_id`, `client_secret` and `refresh_token`.
    pub fn credentials(&self) -> Result<Credentials, ZohoError> {
        Credentials::new(
            self.client_id.clone().unwrap_or_default(),
            self.client_secret.clone().unwrap_or_default(),
            self.refresh_token.clone().unwrap_or_default(),
            self.accounts_url.as_str(),
            self.api_domain.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use secrecy::ExposeSecret as _;

    const SAMPLE_YAML: &str = r#"
client_id: "1000.ABC"
client_secret: "shh"
refresh_token: "1000.refresh"
api_domain: "https://www.zohoapis.eu/"
refresh_margin_secs: 120
"#;

    #[test]
    fn test_default_config() {
        let c = Config::default();
        assert_eq!(c.accounts_url, "https://accounts.zoho.com");
        assert_eq!(c.api_domain, "https://www.zohoapis.com");
        assert_eq!(c.namespace, "bcxcrm");
        assert_eq!(c.refresh_margin(), Duration::from_secs(300));
        assert!(c.client_id.is_none());
    }

    #[test]
    fn test_from_yaml_overrides_and_defaults() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.client_id.as_deref(), Some("1000.ABC"));
        assert_eq!(c.refresh_margin_secs, 120);
        assert_eq!(c.accounts_url, "https://accounts.zoho.com");
    }

    #[test]
    fn test_credentials_trim_trailing_slash() {
        let creds = Config::from_yaml(SAMPLE_YAML).unwrap().credentials().unwrap();
        assert_eq!(creds.api_domain(), "https://www.zohoapis.eu");
        assert_eq!(creds.client_secret().expose_secret(), "shh");
    }

    #[test]
    fn test_credentials_missing_lists_every_key() {
        let c = Config {
            client_id: Some("id".into()),
            client_secret: Some("  ".into()),
            ..Config::default()
        };
        let err = c.credentials().unwrap_err();
        match err {
            ZohoError::MissingConfiguration(msg) => {
                assert_eq!(msg, "client_secret, refresh_token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("shh"));
        assert!(!dbg.contains("1000.refresh"));
        assert!(dbg.contains("1000.ABC"));
    }

    #[test]
    fn test_load_from_environment() {
        Jail::expect_with(|jail| {
            jail.set_env("ZOHO_CLIENT_ID", "env-id");
            jail.set_env("ZOHO_CLIENT_SECRET", "env-secret");
            jail.set_env("REFRESH_TOKEN", "legacy-refresh");
            jail.set_env("API_DOMAIN", "https://legacy.example");
            jail.set_env("ZOHO_REFRESH_MARGIN_SECS", "60");

            let c = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(c.client_id.as_deref(), Some("env-id"));
            assert_eq!(c.refresh_token.as_deref(), Some("legacy-refresh"));
            assert_eq!(c.api_domain, "https://legacy.example");
            assert_eq!(c.refresh_margin_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_wins_over_legacy_and_file() {
        Jail::expect_with(|jail| {
            jail.create_file("zoho.yaml", SAMPLE_YAML)?;
            jail.set_env("API_DOMAIN", "https://legacy.example");
            jail.set_env("ZOHO_API_DOMAIN", "https://prefixed.example");

            let c = Config::load(Some(Path::new("zoho.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(c.api_domain, "https://prefixed.example");
            assert_eq!(c.client_secret.as_deref(), Some("shh"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_malformed_margin() {
        Jail::expect_with(|jail| {
            jail.set_env("ZOHO_REFRESH_MARGIN_SECS", "soon");
            assert!(matches!(Config::load(None), Err(ZohoError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_numeric_looking_credentials_stay_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("ZOHO_CLIENT_ID", "1000.123456");
            jail.set_env("ZOHO_CLIENT_SECRET", "0123456789");
            jail.set_env("REFRESH_TOKEN", "1000.50");
            jail.set_env("ZOHO_NAMESPACE", "2024");
            jail.set_env("ZOHO_REFRESH_MARGIN_SECS", "90");

            let c = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(c.client_id.as_deref(), Some("1000.123456"));
            assert_eq!(c.client_secret.as_deref(), Some("0123456789"));
            assert_eq!(c.refresh_token.as_deref(), Some("1000.50"));
            assert_eq!(c.namespace, "2024");
            assert_eq!(c.refresh_margin_secs, 90);

            let creds = c.credentials().map_err(|e| e.to_string())?;
            assert_eq!(creds.client_secret().expose_secret(), "0123456789");
            Ok(())
        });
    }
}
