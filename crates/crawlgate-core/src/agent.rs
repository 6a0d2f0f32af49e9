//! Crawler identity shared by the HTTP `User-Agent` header and robots.txt agent matching.

use std::fmt;

use thiserror::Error;

/// Product token used when no identity is configured.
pub const DEFAULT_AGENT: &str = "AI-Training-Crawler";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("agent identity is empty")]
    Empty,
    #[error("agent identity {token:?} contains invalid character {ch:?}")]
    InvalidChar { token: String, ch: char },
}

/// A validated crawler product token, e.g. `AI-Training-Crawler`.
///
/// One value is injected into both the fetcher (as the `User-Agent` header)
/// and the resolver (as the agent to match), so the two cannot drift apart.
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted, which keeps the
/// token valid both as a header value and as a robots.txt agent name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentIdentity(String);

impl AgentIdentity {
    pub fn new(token: impl Into<String>) -> Result<Self, IdentityError> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(IdentityError::InvalidChar {
                token: trimmed.to_string(),
                ch,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-insensitive comparison against an agent token from a policy file.
    pub fn matches(&self, token: &str) -> bool {
        self.0.eq_ignore_ascii_case(token.trim())
    }
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self(DEFAULT_AGENT.to_string())
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AgentIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
