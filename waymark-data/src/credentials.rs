//! Resolving which client (and which API key) a run should use.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::debug;
use waymark_core::SearchClient;

use crate::places::{HttpPlacesClient, PlacesClientConfig, ProviderBuildError};

/// Environment variable consulted when no credentials are given.
pub const DEFAULT_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Where a search client comes from.
///
/// Strings parse as follows: the empty string is [`ClientSpec::Unset`],
/// `$NAME` is [`ClientSpec::EnvVar`] and anything else is a literal
/// [`ClientSpec::ApiKey`].
///
/// # Examples
///
/// ```
/// use waymark_data::ClientSpec;
///
/// let spec: ClientSpec = "$MAPS_KEY".parse().unwrap();
/// let key = spec.resolve_api_key_with(|name| (name == "MAPS_KEY").then(|| "abc".to_owned()));
/// assert_eq!(key.as_deref(), Some("abc"));
/// ```
pub enum ClientSpec {
    /// A ready-made client, used as is.
    Client(Box<dyn SearchClient>),
    /// A literal API key.
    ApiKey(String),
    /// The name of an environment variable holding the API key.
    EnvVar(String),
    /// No key; the provider applies its own default behaviour.
    Unset,
}

impl Default for ClientSpec {
    fn default() -> Self {
        Self::EnvVar(DEFAULT_API_KEY_VAR.to_owned())
    }
}

impl fmt::Debug for ClientSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(_) => f.write_str("Client(..)"),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::EnvVar(name) => f.debug_tuple("EnvVar").field(name).finish(),
            Self::Unset => f.write_str("Unset"),
        }
    }
}

impl FromStr for ClientSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => Self::Unset,
            _ => s
                .strip_prefix('$')
                .map_or_else(|| Self::ApiKey(s.to_owned()), |name| Self::EnvVar(name.to_owned())),
        })
    }
}

impl ClientSpec {
    /// The API key this spec names, reading variables through `lookup`.
    ///
    /// A missing variable yields `None` rather than an error. A ready-made
    /// client carries no key of its own.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match self {
            Self::ApiKey(key) => Some(key.clone()),
            Self::EnvVar(name) => {
                let value = lookup(name);
                if value.is_none() {
                    debug!("environment variable {name} is not set; continuing without a key");
                }
                value
            }
            Self::Client(_) | Self::Unset => None,
        }
    }

    /// The API key this spec names, reading the process environment.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Produce a client, building an [`HttpPlacesClient`] from `config` unless
    /// a ready-made one was supplied.
    ///
    /// A resolved key replaces any key already in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the HTTP client cannot be built.
    pub fn into_client_with<F>(
        self,
        config: PlacesClientConfig,
        lookup: F,
    ) -> Result<Box<dyn SearchClient>, ProviderBuildError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let key = self.resolve_api_key_with(lookup);
        let config = match (self, key) {
            (Self::Client(client), _) => return Ok(client),
            (_, Some(key)) => config.with_api_key(key),
            (_, None) => config,
        };
        Ok(Box::new(HttpPlacesClient::with_config(config)?))
    }

    /// [`ClientSpec::into_client_with`] reading the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the HTTP client cannot be built.
    pub fn into_client(
        self,
        config: PlacesClientConfig,
    ) -> Result<Box<dyn SearchClient>, ProviderBuildError> {
        self.into_client_with(config, |name| std::env::var(name).ok())
    }
}
