//! Scripted in-memory [`HttpClient`] shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use batchbook_bridge::http::{HttpClient, HttpError, HttpResponse};

/// One request observed by [`ScriptedHttp`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedCall {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A canned reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    TransportFailure,
}

/// Replies are consumed in order; running out is a test failure.
#[derive(Debug, Default)]
pub struct ScriptedHttp {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedHttp {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(err) => panic!("calls lock poisoned: {err}"),
        }
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<HttpResponse, HttpError> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(RecordedCall {
                method,
                url: url.to_owned(),
                query: query
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
                body: body.cloned(),
            }),
            Err(err) => panic!("calls lock poisoned: {err}"),
        }

        let reply = match self.replies.lock() {
            Ok(mut replies) => replies.pop_front(),
            Err(err) => panic!("replies lock poisoned: {err}"),
        };
        match reply {
            Some(Reply::Json(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::TransportFailure) => Err(transport_error()),
            None => panic!("unexpected {method} {url}: no scripted reply left"),
        }
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, HttpError> {
        self.respond("GET", url, query, None)
    }

    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpResponse, HttpError> {
        self.respond("POST", url, query, Some(body))
    }
}

/// A genuine `reqwest` error, produced without touching the network.
pub fn transport_error() -> HttpError {
    match reqwest::Client::new().get("not a url").build() {
        Ok(_) => panic!("request with an invalid URL should not build"),
        Err(err) => HttpError::Request(err),
    }
}
