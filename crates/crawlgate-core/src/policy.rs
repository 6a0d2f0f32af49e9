//! Policy documents as returned by a fetch attempt.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome class of a policy fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// 2xx response; content holds the body.
    Ok,
    /// The server answered with a non-2xx status.
    Unavailable,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// Connection, DNS, body-read or URL errors.
    Error,
}

impl FetchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw policy text for one host, plus how the fetch went.
///
/// Content is always empty unless `status` is [`FetchStatus::Ok`]; use
/// [`text`](Self::text) to branch on the "no policy" case explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    host: String,
    content: String,
    fetched_at: DateTime<Utc>,
    status: FetchStatus,
}

impl PolicyDocument {
    pub fn ok(host: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            content: content.into(),
            fetched_at: Utc::now(),
            status: FetchStatus::Ok,
        }
    }

    /// A document that carries no policy text. `status` must not be `Ok`.
    pub fn failed(host: impl Into<String>, status: FetchStatus) -> Self {
        debug_assert_ne!(status, FetchStatus::Ok);
        Self {
            host: host.into(),
            content: String::new(),
            fetched_at: Utc::now(),
            status,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Policy text, or `None` when no policy could be obtained.
    pub fn text(&self) -> Option<&str> {
        match self.status {
            FetchStatus::Ok => Some(&self.content),
            _ => None,
        }
    }
}
