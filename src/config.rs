//! Configuration loading for the adapter.
//!
//! The helpdesk hands the adapter a fixed set of per-installation
//! [`Settings`]. When run from the command line the same settings are read
//! from the `[batchbook]` table of a TOML file.

use std::path::Path;

use serde::Deserialize;

/// Top-level configuration file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Batchbook installation settings.
    pub batchbook: Settings,
}

/// Per-installation settings supplied by the helpdesk.
///
/// Required strings default to empty so that a missing value is reported by
/// [`crate::validate::validate`] as blank rather than as a parse failure.
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Batchbook API token, sent as the `auth_token` query parameter.
    #[serde(default)]
    pub auth_token: String,

    /// Batchbook account subdomain (`company` in `https://company.batchbook.com`).
    #[serde(default)]
    pub subdomain: String,

    /// Create a Batchbook contact when the requester has none.
    #[serde(default = "default_should_create_person")]
    pub should_create_person: bool,

    /// Send the full ticket HTML instead of the one-line summary.
    #[serde(default)]
    pub send_ticket_contents: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("auth_token", &"[REDACTED]")
            .field("subdomain", &self.subdomain)
            .field("should_create_person", &self.should_create_person)
            .field("send_ticket_contents", &self.send_ticket_contents)
            .finish()
    }
}

impl Settings {
    /// Build settings with the default flags.
    pub fn new(subdomain: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            subdomain: subdomain.into(),
            should_create_person: default_should_create_person(),
            send_ticket_contents: false,
        }
    }
}

fn default_should_create_person() -> bool {
    true
}

/// Returns `true` when the value is empty or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Load the configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}
