//! Batchbook CRM REST API: wire types and client.
//!
//! Only the three endpoints the adapter needs are modelled:
//! - `GET people.json` (lookup by email, also used as the validation probe)
//! - `POST people.json` (create a contact)
//! - `POST communications.json` (log a ticket against a contact)
//!
//! Records returned by the CRM keep any fields not modelled here in an
//! `extra` map so they round-trip unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::http::HttpError;
use crate::validate::ValidationErrors;

pub mod client;

pub use client::BatchbookClient;

/// Tag attached to every contact the adapter creates.
pub const PROVENANCE_TAG: &str = "SupportBee";

/// Label given to the requester's email on created contacts.
pub const WORK_EMAIL_LABEL: &str = "work";

/// Communication type used for ticket logs.
pub const COMMUNICATION_TYPE_EMAIL: &str = "email";

/// Participant type for the ticket requester.
pub const PARTICIPANT_TYPE_FROM: &str = "from";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from Batchbook calls made while handling a ticket event.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// The HTTP call itself failed.
    #[error("batchbook transport error: {0}")]
    Transport(#[from] HttpError),
    /// Batchbook answered with a non-success status.
    #[error("batchbook returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The response did not contain the expected envelope.
    #[error("batchbook response parse error: {0}")]
    Parse(String),
    /// Required settings are blank; no call was made.
    #[error(transparent)]
    Settings(#[from] ValidationErrors),
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// A Batchbook contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// CRM-assigned identifier.
    pub id: u64,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: Vec<Email>,
    /// Phone numbers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub phones: Vec<Phone>,
    /// Postal addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,
    /// Tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// "first last", trimmed. Empty when both names are missing.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_owned()
    }

    /// Number of the first phone, or empty.
    pub fn primary_number(&self) -> String {
        self.phones
            .first()
            .and_then(|phone| phone.number.clone())
            .unwrap_or_default()
    }

    /// First address as a single comma-separated line, or empty.
    pub fn primary_address(&self) -> String {
        self.addresses
            .first()
            .map(Address::one_line)
            .unwrap_or_default()
    }
}

/// An email entry on a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    /// The address.
    pub address: String,
    /// Whether this is the contact's primary address.
    #[serde(default)]
    pub primary: bool,
    /// Free-form label ("work", "home", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A phone entry on a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    /// The number as entered in Batchbook.
    #[serde(default)]
    pub number: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A postal address on a contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// First street line.
    #[serde(default)]
    pub address_1: Option<String>,
    /// Second street line.
    #[serde(default)]
    pub address_2: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Address {
    /// Join the non-empty parts with ", ".
    pub fn one_line(&self) -> String {
        [
            &self.address_1,
            &self.address_2,
            &self.city,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A tag on a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
}

/// Body of a contact creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPerson {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Tags to attach.
    pub tags: Vec<Tag>,
    /// Email entries to attach.
    pub emails: Vec<Email>,
}

/// Response of `GET people.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeopleList {
    /// Number of matching contacts reported by the CRM. Required.
    pub total: u64,
    /// Matching contacts, in CRM order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub people: Vec<Person>,
}

/// `{ "person": ... }` envelope used by the people endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonEnvelope<T> {
    /// The wrapped record.
    pub person: T,
}

// ---------------------------------------------------------------------------
// Communications
// ---------------------------------------------------------------------------

/// A Batchbook communication log entry.
///
/// Used both as the creation payload (without `id`) and as the record
/// returned by the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    /// CRM-assigned identifier, absent on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Title; the ticket subject.
    pub title: String,
    /// HTML body.
    #[serde(default)]
    pub body: String,
    /// Communication type; always "email" for ticket logs.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Contacts involved.
    #[serde(default, deserialize_with = "null_as_default")]
    pub participants: Vec<Participant>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A contact referenced by a communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant role ("from").
    #[serde(rename = "type")]
    pub kind: String,
    /// Referenced contact id.
    pub contact_id: u64,
    /// Referenced contact display name.
    #[serde(default)]
    pub contact_name: String,
}

/// `{ "communication": ... }` envelope used by the communications endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationEnvelope<T> {
    /// The wrapped record.
    pub communication: T,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
