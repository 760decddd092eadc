//! Batchbook REST client over an injected [`HttpClient`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{
    Communication, CommunicationEnvelope, CrmError, Email, NewPerson, Participant, PeopleList,
    Person, PersonEnvelope, Tag, COMMUNICATION_TYPE_EMAIL, PARTICIPANT_TYPE_FROM, PROVENANCE_TAG,
    WORK_EMAIL_LABEL,
};
use crate::config::Settings;
use crate::helpdesk::{Requester, TicketEvent};
use crate::http::{sanitize_error_body, HttpClient, HttpError, HttpResponse};
use crate::render::communication_body;

/// Batchbook web host; accounts live under `https://{subdomain}.{API_HOST}`.
pub const API_HOST: &str = "batchbook.com";

/// Base URL of the v1 REST API for an account.
pub fn api_base_url(subdomain: &str) -> String {
    format!("https://{subdomain}.{API_HOST}/api/v1/")
}

/// Contact page in the Batchbook web UI.
pub fn profile_url(subdomain: &str, person_id: u64) -> String {
    format!("https://{subdomain}.{API_HOST}/contacts/{person_id}")
}

/// Client for one Batchbook account.
#[derive(Clone)]
pub struct BatchbookClient {
    settings: Settings,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BatchbookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchbookClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl BatchbookClient {
    /// Create a client for the account described by `settings`.
    pub fn new(settings: Settings, http: Arc<dyn HttpClient>) -> Self {
        Self { settings, http }
    }

    /// The settings this client was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Full endpoint URL for a resource, e.g. `people` -> `.../people.json`.
    pub fn api_url(&self, resource: &str) -> String {
        format!("{}{resource}.json", api_base_url(&self.settings.subdomain))
    }

    /// Issue an authenticated `GET people.json` and return the raw response.
    ///
    /// Used as the connectivity probe when validating settings.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be completed.
    pub async fn ping(&self) -> Result<HttpResponse, HttpError> {
        self.http.get(&self.api_url("people"), &self.auth_query()).await
    }

    /// Look up a contact by email address.
    ///
    /// Returns the first contact in CRM order when the reported total is
    /// positive, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError`] on transport failure, non-success status or an
    /// unexpected response shape.
    pub async fn find_person(&self, email: &str) -> Result<Option<Person>, CrmError> {
        let mut query = self.auth_query();
        query.push(("email", email));
        let response = self.http.get(&self.api_url("people"), &query).await?;
        let list: PeopleList = self.decode(response)?;
        debug!(total = list.total, "batchbook people lookup");
        if list.total > 0 {
            Ok(list.people.into_iter().next())
        } else {
            Ok(None)
        }
    }

    /// Create a contact for a ticket requester.
    ///
    /// The contact is tagged with [`PROVENANCE_TAG`] and carries the
    /// requester email as its primary work address.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError`] when the creation call fails. Not retried.
    pub async fn create_person(&self, requester: &Requester) -> Result<Person, CrmError> {
        let payload = PersonEnvelope {
            person: new_person_payload(requester),
        };
        let body = serde_json::to_value(&payload).map_err(|e| CrmError::Parse(e.to_string()))?;
        let response = self
            .http
            .post(&self.api_url("people"), &self.auth_query(), &body)
            .await?;
        let created: PersonEnvelope<Person> = self.decode(response)?;
        info!(person_id = created.person.id, "created batchbook contact");
        Ok(created.person)
    }

    /// Log a ticket as a communication on `person`.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError`] when the creation call fails. Not retried.
    pub async fn create_communication(
        &self,
        person: &Person,
        event: &TicketEvent,
    ) -> Result<Communication, CrmError> {
        let payload = CommunicationEnvelope {
            communication: communication_payload(
                person,
                event,
                self.settings.send_ticket_contents,
            ),
        };
        let body = serde_json::to_value(&payload).map_err(|e| CrmError::Parse(e.to_string()))?;
        let response = self
            .http
            .post(&self.api_url("communications"), &self.auth_query(), &body)
            .await?;
        let created: CommunicationEnvelope<Communication> = self.decode(response)?;
        info!(
            person_id = person.id,
            communication_id = ?created.communication.id,
            ticket_id = event.ticket.id,
            "logged ticket as batchbook communication"
        );
        Ok(created.communication)
    }

    fn auth_query(&self) -> Vec<(&str, &str)> {
        vec![("auth_token", self.settings.auth_token.as_str())]
    }

    fn decode<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, CrmError> {
        if !response.is_success() {
            let raw = match &response.body {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Err(CrmError::HttpStatus {
                status: response.status,
                body: sanitize_error_body(&raw, &self.settings.auth_token),
            });
        }
        serde_json::from_value(response.body).map_err(|e| CrmError::Parse(e.to_string()))
    }
}

/// Contact payload for a requester.
#[doc(hidden)]
pub fn new_person_payload(requester: &Requester) -> NewPerson {
    let (first_name, last_name) = requester.split_name();
    NewPerson {
        first_name,
        last_name,
        tags: vec![Tag {
            name: PROVENANCE_TAG.to_owned(),
        }],
        emails: vec![Email {
            address: requester.email.clone(),
            primary: true,
            label: Some(WORK_EMAIL_LABEL.to_owned()),
            extra: Map::new(),
        }],
    }
}

/// Communication payload for a ticket logged against `person`.
#[doc(hidden)]
pub fn communication_payload(
    person: &Person,
    event: &TicketEvent,
    send_ticket_contents: bool,
) -> Communication {
    Communication {
        id: None,
        title: event.ticket.subject.clone(),
        body: communication_body(&event.ticket, &event.auth.subdomain, send_ticket_contents),
        kind: COMMUNICATION_TYPE_EMAIL.to_owned(),
        participants: vec![Participant {
            kind: PARTICIPANT_TYPE_FROM.to_owned(),
            contact_id: person.id,
            contact_name: person.display_name(),
        }],
        extra: Map::new(),
    }
}
