//! Connection settings and per-call configuration resolution.
//!
//! [`Settings`] holds the raw values captured once at process start.
//! [`Settings::resolve`] validates them into a [`Configuration`] every time an
//! operation runs, so a missing credential surfaces as an error on the call
//! that needed it rather than at startup.

use std::env;
use std::ffi::OsString;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use url::Url;

use crate::error::{JiraError, Result};

/// Environment variable holding the REST API base URL.
pub const URL_VAR: &str = "JIRA_URL";
/// Environment variable holding the optional username.
pub const USERNAME_VAR: &str = "JIRA_USERNAME";
/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "JIRA_API_TOKEN";

const SECRET_MARKERS: [&str; 4] = ["TOKEN", "SECRET", "PASSWORD", "KEY"];

/// Raw connection settings.
///
/// Immutable once built. Values are only validated by [`Settings::resolve`].
#[derive(Clone, Default)]
pub struct Settings {
    url: Option<String>,
    username: Option<String>,
    token: Option<String>,
    /// Variables listed when the base URL is missing; the live process
    /// environment when unset.
    environment: Option<Vec<(String, String)>>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

/// Validated configuration for a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Complete `Authorization` header value.
    pub auth_header: String,
}

impl Settings {
    /// Build settings from explicit values.
    ///
    /// Empty strings are treated as absent.
    pub fn new(url: Option<String>, username: Option<String>, token: Option<String>) -> Self {
        Self {
            url: non_empty(url),
            username: non_empty(username),
            token: non_empty(token),
            environment: None,
        }
    }

    /// Build settings from `JIRA_URL`, `JIRA_USERNAME` and `JIRA_API_TOKEN`.
    pub fn from_env() -> Self {
        Self::new(
            env::var(URL_VAR).ok(),
            env::var(USERNAME_VAR).ok(),
            env::var(TOKEN_VAR).ok(),
        )
    }

    /// List these variables instead of the process environment when the
    /// base URL is missing.
    ///
    /// Names and values that are not valid UTF-8 are converted lossily.
    #[must_use]
    pub fn with_environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.environment = Some(lossy_environment(
            vars.into_iter().map(|(k, v)| (k.into(), v.into())),
        ));
        self
    }

    /// Whether both required values are present.
    pub fn is_complete(&self) -> bool {
        self.url.is_some() && self.token.is_some()
    }

    /// Validate the settings into a [`Configuration`].
    ///
    /// When the base URL is missing the error lists the environment, read
    /// at that moment unless [`Settings::with_environment`] supplied one.
    /// Values of variables whose names contain `TOKEN`, `SECRET`, `PASSWORD`
    /// or `KEY` are printed as `***` rather than verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Configuration`] if the base URL or the token is
    /// missing, or if the base URL is not an absolute URL.
    pub fn resolve(&self) -> Result<Configuration> {
        let Some(url) = self.url.as_deref() else {
            return Err(JiraError::Configuration(format!(
                "missing required environment variable: {URL_VAR}\nAvailable environment variables:\n{}",
                self.describe_environment()
            )));
        };

        let auth_header = self.auth_header()?;

        let base_url = url.strip_suffix('/').unwrap_or(url);
        Url::parse(base_url).map_err(|e| {
            JiraError::Configuration(format!("invalid {URL_VAR} '{base_url}': {e}"))
        })?;

        Ok(Configuration {
            base_url: base_url.to_string(),
            auth_header,
        })
    }

    /// Build the `Authorization` header value.
    ///
    /// Basic when a username is set, Bearer otherwise.
    fn auth_header(&self) -> Result<String> {
        let token = self.token.as_deref().ok_or_else(|| {
            JiraError::Configuration(format!(
                "missing required environment variable: {TOKEN_VAR}"
            ))
        })?;

        Ok(match self.username.as_deref() {
            Some(username) => {
                let encoded = BASE64.encode(format!("{username}:{token}"));
                format!("Basic {encoded}")
            }
            None => format!("Bearer {token}"),
        })
    }

    fn describe_environment(&self) -> String {
        let live;
        let vars = match &self.environment {
            Some(vars) => vars,
            None => {
                live = lossy_environment(env::vars_os());
                &live
            }
        };

        vars.iter()
            .map(|(key, value)| {
                let upper = key.to_ascii_uppercase();
                if SECRET_MARKERS.iter().any(|m| upper.contains(m)) {
                    format!("{key}=***")
                } else {
                    format!("{key}={value}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Sorted `(name, value)` pairs, replacing invalid UTF-8 rather than failing.
fn lossy_environment<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut vars: Vec<_> = vars
        .into_iter()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect();
    vars.sort();
    vars
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
