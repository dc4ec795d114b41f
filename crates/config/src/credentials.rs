//! Immutable OAuth credential set handed to the client at construction.

use secrecy::SecretString;
use zcreator_types::ZohoError;

/// OAuth app credentials plus the two service base URLs.
///
/// Only [`Credentials::new`] builds one, so a value of this type always
/// carries a non-empty client ID, client secret and refresh token. Secrets
/// stay wrapped in [`SecretString`] so `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    accounts_url: String,
    api_domain: String,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Credentials {
    /// Build credentials pointing at the given service base URLs.
    ///
    /// Trailing slashes on the URLs are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::MissingConfiguration`] listing every empty or
    /// blank key among `client_id`, `client_secret` and `refresh_token`.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        accounts_url: impl Into<String>,
        api_domain: impl Into<String>,
    ) -> Result<Self, ZohoError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        let refresh_token = refresh_token.into();

        let missing: Vec<&str> = [
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ]
        .into_iter()
        .filter_map(|(name, v)| is_blank(v).then_some(name))
        .collect();
        if !missing.is_empty() {
            return Err(ZohoError::MissingConfiguration(missing.join(", ")));
        }

        Ok(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
            refresh_token: SecretString::from(refresh_token),
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            api_domain: api_domain.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    /// Long-lived refresh token from the authorization-code bootstrap.
    #[must_use]
    pub fn refresh_token(&self) -> &SecretString {
        &self.refresh_token
    }

    #[must_use]
    pub fn accounts_url(&self) -> &str {
        &self.accounts_url
    }

    #[must_use]
    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }

    /// The token endpoint shared by refresh and authorization-code grants.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_url)
    }
}
