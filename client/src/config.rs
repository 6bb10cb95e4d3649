//! Settings for talking to a local OpenAI-compatible model server.
//!
//! Values come from an environment snapshot layered over literal defaults:
//!
//! | variable               | default                    |
//! |------------------------|----------------------------|
//! | `LOCAL_MODEL_BASE_URL` | `http://localhost:8080/v1` |
//! | `LOCAL_API_KEY`        | `dummy-key`                |
//! | `LOCAL_MODEL_NAME`     | `ai/smollm2`               |
//! | `DEFAULT_MAX_TOKENS`   | `150`                      |
//! | `DEFAULT_TEMPERATURE`  | `0.7`                      |

use config::{Config, Environment};
use std::ffi::OsString;
use tracing::debug;

use crate::Client;
use crate::error::{ClientError, Result};

pub const BASE_URL_VAR: &str = "LOCAL_MODEL_BASE_URL";
pub const API_KEY_VAR: &str = "LOCAL_API_KEY";
pub const MODEL_NAME_VAR: &str = "LOCAL_MODEL_NAME";
pub const MAX_TOKENS_VAR: &str = "DEFAULT_MAX_TOKENS";
pub const TEMPERATURE_VAR: &str = "DEFAULT_TEMPERATURE";

const VARS: [&str; 5] = [
    BASE_URL_VAR,
    API_KEY_VAR,
    MODEL_NAME_VAR,
    MAX_TOKENS_VAR,
    TEMPERATURE_VAR,
];

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_API_KEY: &str = "dummy-key";
pub const DEFAULT_MODEL_ID: &str = "ai/smollm2";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ClientConfig {
    /// Loads settings from a snapshot of the current process environment.
    ///
    /// Only the variables listed in the module docs are read.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if one of them is not valid UTF-8 or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_source(snapshot(|name| std::env::var_os(name))?)
    }

    /// Loads settings from an explicit set of environment-style variables.
    ///
    /// Empty values count as unset. Unparseable numbers, a zero token limit or
    /// a temperature outside `[0, 2]` are rejected.
    pub fn from_source<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let snapshot: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        // The environment source lowercases keys.
        let settings = Config::builder()
            .set_default(key(BASE_URL_VAR), DEFAULT_BASE_URL)?
            .set_default(key(API_KEY_VAR), DEFAULT_API_KEY)?
            .set_default(key(MODEL_NAME_VAR), DEFAULT_MODEL_ID)?
            .set_default(key(MAX_TOKENS_VAR), i64::from(DEFAULT_MAX_TOKENS))?
            .set_default(key(TEMPERATURE_VAR), f64::from(DEFAULT_TEMPERATURE))?
            .add_source(
                Environment::default()
                    .source(Some(snapshot))
                    .ignore_empty(true),
            )
            .build()?;

        let max_tokens = settings.get_int(&key(MAX_TOKENS_VAR))?;
        let max_tokens = u32::try_from(max_tokens)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ClientError::InvalidConfig(format!(
                    "{MAX_TOKENS_VAR} must be a positive integer, got {max_tokens}"
                ))
            })?;

        let temperature = settings.get_float(&key(TEMPERATURE_VAR))?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ClientError::InvalidConfig(format!(
                "{TEMPERATURE_VAR} must be between 0 and 2, got {temperature}"
            )));
        }

        let config = Self {
            base_url: settings.get_string(&key(BASE_URL_VAR))?,
            api_key: settings.get_string(&key(API_KEY_VAR))?,
            model_id: settings.get_string(&key(MODEL_NAME_VAR))?,
            max_tokens,
            temperature: temperature as f32,
        };

        debug!(
            base_url = %config.base_url,
            model = %config.model_id,
            max_tokens = config.max_tokens,
            temperature = config.temperature,
            "loaded client config"
        );

        Ok(config)
    }

    /// Builds an API client bound to this base URL and key.
    pub fn client(&self) -> Client {
        Client::new(&self.base_url, &self.api_key)
    }

    /// Checks that the base URL has an HTTP scheme.
    ///
    /// This is a syntax check only; use [`Client::ping`] to probe the server.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the URL does not start with `http`.
    pub fn validate_base_url(&self) -> Result<()> {
        if !self.base_url.starts_with("http") {
            return Err(ClientError::InvalidConfig(
                "base_url must be a valid URL".to_string(),
            ));
        }
        Ok(())
    }
}

/// Looks up each known variable by name. Unset ones are left out.
fn snapshot<F>(lookup: F) -> Result<Vec<(String, String)>>
where
    F: Fn(&str) -> Option<OsString>,
{
    VARS.iter()
        .filter_map(|name| lookup(*name).map(|value| (*name, value)))
        .map(|(name, value)| {
            value
                .into_string()
                .map(|value| (name.to_string(), value))
                .map_err(|_| ClientError::InvalidConfig(format!("{name} is not valid UTF-8")))
        })
        .collect()
}

fn key(var: &str) -> String {
    var.to_lowercase()
}
