//! HTML snippets shown in the helpdesk UI and sent to Batchbook.
//!
//! Everything here is pure string formatting. Values are inserted as-is:
//! ticket HTML is meant to pass through, and names come from the CRM.

use crate::batchbook::client::profile_url;
use crate::batchbook::Person;
use crate::helpdesk::{ticket_url, Ticket};

/// Details of an existing contact: name, phone, address and profile link.
///
/// The phone and address lines are omitted when empty.
pub fn person_details_html(crm_subdomain: &str, person: &Person) -> String {
    let mut html = format!("<b>{}</b><br />", person.display_name());
    let number = person.primary_number();
    if !number.trim().is_empty() {
        html.push_str(&format!("{number}<br />"));
    }
    let address = person.primary_address();
    if !address.trim().is_empty() {
        html.push_str(&format!("{address}<br />"));
    }
    html.push_str(&person_link_html(crm_subdomain, person));
    html
}

/// Confirmation for a contact the adapter just created.
pub fn new_person_details_html(crm_subdomain: &str, person: &Person) -> String {
    format!(
        "Added <b>{}</b> to Batchbook<br />{}",
        person.display_name(),
        person_link_html(crm_subdomain, person)
    )
}

/// Link to the contact's page in the Batchbook web UI.
pub fn person_link_html(crm_subdomain: &str, person: &Person) -> String {
    format!(
        "<a href='{}'>View {}'s profile on Batchbook</a>",
        profile_url(crm_subdomain, person.id),
        person.first_name.as_deref().unwrap_or_default()
    )
}

/// Body of the communication logged for a ticket.
///
/// The full ticket HTML when `send_ticket_contents` is set, the summary
/// otherwise, followed by a link back to the ticket.
pub fn communication_body(
    ticket: &Ticket,
    helpdesk_subdomain: &str,
    send_ticket_contents: bool,
) -> String {
    let text = if send_ticket_contents {
        ticket.content.html.as_str()
    } else {
        ticket.summary.as_str()
    };
    let url = ticket_url(helpdesk_subdomain, ticket.id);
    format!("{text}<br /><a href='{url}'>{url}</a>")
}
