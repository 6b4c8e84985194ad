use aws_sdk_ec2::config::Credentials;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
}

/// AWS settings read from the process environment.
///
/// Nothing here is required. Whatever is missing is left to the SDK's default
/// provider chain, and bad credentials surface on the first EC2 call.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<SecretString>,
    pub aws_default_region: Option<String>,
    pub aws_session_token: Option<SecretString>,
    pub aws_account_id: Option<String>,
}

impl Settings {
    /// Loads settings from the environment, after applying a `.env` file if present.
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenv::dotenv().ok();
        Ok(envy::from_env()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    pub fn region(&self) -> Option<&str> {
        self.aws_default_region.as_deref().filter(|r| !r.is_empty())
    }

    /// Static credentials, when both halves of the key pair are set.
    pub fn static_credentials(&self) -> Option<Credentials> {
        let access_key_id = self.aws_access_key_id.as_deref().filter(|k| !k.is_empty())?;
        let secret_access_key = self
            .aws_secret_access_key
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.is_empty())?;
        let session_token = self
            .aws_session_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .filter(|t| !t.is_empty());

        Some(Credentials::new(
            access_key_id,
            secret_access_key,
            session_token,
            None,
            "environment",
        ))
    }
}
