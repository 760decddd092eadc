//! Ticket-event handling: resolve the requester in Batchbook, create the
//! contact when allowed, then log the ticket against it.
//!
//! Each event is handled on its own with at most three sequential calls
//! (lookup, optional create, communication). Nothing is retried and a
//! contact created before a failed communication call is left in place.

use std::sync::Arc;

use tracing::{debug, info};

use crate::batchbook::{BatchbookClient, Communication, CrmError, Person};
use crate::config::Settings;
use crate::helpdesk::TicketEvent;
use crate::http::HttpClient;
use crate::render::{new_person_details_html, person_details_html};
use crate::validate::check_required;

/// How the requester was matched to a Batchbook contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An existing contact matched the requester email.
    Found,
    /// No contact matched and one was created.
    Created,
    /// No contact matched and creation is disabled.
    Skipped,
}

/// Result of handling one ticket event.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketOutcome {
    /// How the contact was resolved.
    pub resolution: Resolution,
    /// The resolved contact, if any.
    pub person: Option<Person>,
    /// The logged communication; present whenever `person` is.
    pub communication: Option<Communication>,
    /// HTML summary for the helpdesk UI, empty when skipped.
    pub html: String,
}

/// Connects helpdesk ticket events to one Batchbook account.
#[derive(Debug, Clone)]
pub struct Adapter {
    client: BatchbookClient,
}

impl Adapter {
    /// Create an adapter for the account described by `settings`.
    pub fn new(settings: Settings, http: Arc<dyn HttpClient>) -> Self {
        Self {
            client: BatchbookClient::new(settings, http),
        }
    }

    /// Handle a newly created ticket.
    ///
    /// A requester without a contact while contact creation is disabled is
    /// not an error: the event completes without logging anything.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::Settings`] before any call when `subdomain` or
    /// `auth_token` is blank, otherwise the error of the first Batchbook
    /// call that fails.
    pub async fn on_ticket_created(&self, event: &TicketEvent) -> Result<TicketOutcome, CrmError> {
        let requester = &event.ticket.requester;
        let settings = self.client.settings();
        check_required(settings)?;

        let (person, resolution, html) = match self.client.find_person(&requester.email).await? {
            Some(person) => {
                debug!(person_id = person.id, "requester matched existing contact");
                let html = person_details_html(&settings.subdomain, &person);
                (person, Resolution::Found, html)
            }
            None if settings.should_create_person => {
                let person = self.client.create_person(requester).await?;
                let html = new_person_details_html(&settings.subdomain, &person);
                (person, Resolution::Created, html)
            }
            None => {
                info!(
                    ticket_id = event.ticket.id,
                    "no batchbook contact for requester and creation disabled"
                );
                return Ok(TicketOutcome {
                    resolution: Resolution::Skipped,
                    person: None,
                    communication: None,
                    html: String::new(),
                });
            }
        };

        let communication = self.client.create_communication(&person, event).await?;
        Ok(TicketOutcome {
            resolution,
            person: Some(person),
            communication: Some(communication),
            html,
        })
    }
}
