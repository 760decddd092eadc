//! Settings validation, run whenever an installation saves its settings.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::batchbook::BatchbookClient;
use crate::config::{is_blank, Settings};
use crate::http::HttpClient;

/// Message for a required field left blank.
pub const BLANK_MESSAGE: &str = "Cannot be blank";

/// Message shown when the connectivity probe fails.
pub const PROBE_FAILED_MESSAGE: &str =
    "Settings Incorrect. Please check the Subdomain and Auth Token";

/// Error key for messages not tied to a single field.
pub const FLASH_KEY: &str = "flash";

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("invalid settings: {}", describe(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// A single error for `field`.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_owned(), message.to_owned());
        Self { errors }
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn describe(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reject blank required settings without touching the network.
///
/// `subdomain` is checked before `auth_token`; only the first blank field
/// is reported.
///
/// # Errors
///
/// Returns [`ValidationErrors`] naming the blank field.
pub fn check_required(settings: &Settings) -> Result<(), ValidationErrors> {
    if is_blank(&settings.subdomain) {
        return Err(ValidationErrors::single("subdomain", BLANK_MESSAGE));
    }
    if is_blank(&settings.auth_token) {
        return Err(ValidationErrors::single("auth_token", BLANK_MESSAGE));
    }
    Ok(())
}

/// Validate settings and probe Batchbook with them.
///
/// Checks run in order and stop at the first failure: blank `subdomain`,
/// blank `auth_token`, then one `GET people.json`. Transport failures and
/// rejected credentials both surface as the same [`FLASH_KEY`] message.
///
/// # Errors
///
/// Returns [`ValidationErrors`] describing the first failing check.
pub async fn validate(
    settings: &Settings,
    http: Arc<dyn HttpClient>,
) -> Result<(), ValidationErrors> {
    check_required(settings)?;

    let client = BatchbookClient::new(settings.clone(), http);
    match client.ping().await {
        Ok(response) if response.is_success() => Ok(()),
        Ok(response) => {
            warn!(status = response.status, "batchbook rejected settings probe");
            Err(ValidationErrors::single(FLASH_KEY, PROBE_FAILED_MESSAGE))
        }
        Err(e) => {
            warn!(error = %e, "batchbook settings probe failed");
            Err(ValidationErrors::single(FLASH_KEY, PROBE_FAILED_MESSAGE))
        }
    }
}
