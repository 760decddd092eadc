//! Inbound ticket-event payload delivered by the helpdesk.

use serde::{Deserialize, Serialize};

/// Helpdesk web host; tickets live under `https://{subdomain}.{HELPDESK_HOST}`.
pub const HELPDESK_HOST: &str = "supportbee.com";

/// A ticket event as handed over by the helpdesk plugin host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEvent {
    /// Helpdesk account the event came from.
    pub auth: HelpdeskAuth,
    /// The ticket that triggered the event.
    pub ticket: Ticket,
}

/// Identity of the helpdesk account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpdeskAuth {
    /// Helpdesk account subdomain.
    pub subdomain: String,
}

/// Ticket fields the adapter reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket identifier.
    pub id: u64,
    /// Ticket subject line.
    pub subject: String,
    /// One-line plain-text summary.
    #[serde(default)]
    pub summary: String,
    /// Full ticket body.
    #[serde(default)]
    pub content: TicketContent,
    /// The person who opened the ticket.
    pub requester: Requester,
}

/// Ticket body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketContent {
    /// HTML rendition of the body.
    #[serde(default)]
    pub html: String,
}

/// The end user who submitted a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// Requester email address.
    pub email: String,
    /// Display name, usually "First Last".
    #[serde(default)]
    pub name: Option<String>,
}

impl Requester {
    /// Split the requester name into `(first_name, last_name)`.
    ///
    /// Only the first two whitespace-separated words are used; any further
    /// words are dropped. A missing or blank name falls back to the email
    /// address as first name with an empty last name.
    pub fn split_name(&self) -> (String, String) {
        let mut words = self.name.as_deref().unwrap_or_default().split_whitespace();
        match words.next() {
            Some(first) => (first.to_owned(), words.next().unwrap_or_default().to_owned()),
            None => (self.email.clone(), String::new()),
        }
    }
}

/// Link back to a ticket in the helpdesk web UI.
pub fn ticket_url(helpdesk_subdomain: &str, ticket_id: u64) -> String {
    format!("https://{helpdesk_subdomain}.{HELPDESK_HOST}/tickets/{ticket_id}")
}
