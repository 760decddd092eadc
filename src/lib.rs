//! Batchbook bridge: logs helpdesk tickets in the Batchbook CRM.
//!
//! On each new ticket the requester is looked up by email, created as a
//! contact when missing (if enabled), and the ticket is recorded as a
//! communication on that contact. Small HTML snippets describing the
//! contact are returned for display in the helpdesk.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod batchbook;
pub mod config;
pub mod helpdesk;
pub mod http;
pub mod logging;
pub mod render;
pub mod validate;
