//! Error types shared by request construction and request execution.
//!
//! # Design
//! `Usage` is raised synchronously by the call that broke a precondition.
//! `Transport`, `UnsuccessfulResponse` and `Deserialization` only come out of
//! executor operations; each keeps its own variant so callers can tell a
//! client-side connection problem apart from a problem the server reported.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RestError>;

/// Errors produced by builders, type witnesses and executors.
#[derive(Debug, Error)]
pub enum RestError {
    /// A caller violated a precondition. Never retried.
    #[error("usage error: {0}")]
    Usage(String),

    /// The request never produced a response (connect, I/O, TLS, timeout).
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered with a status other than the one the caller
    /// declared successful.
    #[error("unsuccessful response: expected HTTP {expected}, got HTTP {status}")]
    UnsuccessfulResponse {
        status: u16,
        expected: u16,
        problem: Option<Problem>,
        body: String,
    },

    /// The response body did not match the requested object type.
    #[error("cannot deserialize response into `{target}`: {message}")]
    Deserialization { target: &'static str, message: String },

    /// The request body or a composite value could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("validation failed for `{service}`: {errors}")]
    Validation {
        service: &'static str,
        #[source]
        errors: validator::ValidationErrors,
    },
}

impl RestError {
    pub fn usage(message: impl Into<String>) -> Self {
        RestError::Usage(message.into())
    }

    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RestError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn deserialization(target: &'static str, message: impl ToString) -> Self {
        RestError::Deserialization {
            target,
            message: message.to_string(),
        }
    }

    /// Status code returned by the server, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::UnsuccessfulResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Problem document reported by the server, if it sent one.
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            RestError::UnsuccessfulResponse { problem, .. } => problem.as_ref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RestError::Transport { .. })
    }
}

/// RFC 7807 problem details document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Problem {
            status: Some(status),
            title: Some(title.into()),
            ..Problem::default()
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Parse a response body as a problem document. Bodies that are empty or
    /// carry none of the problem members yield `None`.
    pub fn from_body(body: &str) -> Option<Problem> {
        if body.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<Problem>(body)
            .ok()
            .filter(|problem| *problem != Problem::default())
    }
}
