//! Allow/deny resolution for one agent and one request path.
//!
//! Precedence, first match wins:
//!
//! 1. `User-agent` must equal the crawler identity (case-insensitive), else deny.
//! 2. A `Disallow` prefix of the path denies.
//! 3. An `Allow` prefix of the path allows.
//! 4. Anything else denies.
//!
//! Disallow is checked before Allow regardless of source order, so an
//! overlapping disallow always wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agent::AgentIdentity;
use crate::directives::{Directive, DirectiveTable};

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    AgentNotMatched,
    DisallowPrefix,
    AllowPrefix,
    DefaultDeny,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AgentNotMatched => "agent-not-matched",
            Self::DisallowPrefix => "disallow-prefix",
            Self::AllowPrefix => "allow-prefix",
            Self::DefaultDeny => "default-deny",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a path against a directive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub path: String,
    pub directives: DirectiveTable,
    pub reason: Reason,
}

/// Resolver bound to a single crawler identity.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    agent: AgentIdentity,
}

impl Resolver {
    pub fn new(agent: AgentIdentity) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &AgentIdentity {
        &self.agent
    }

    pub fn resolve(&self, directives: DirectiveTable, path: &str) -> AccessDecision {
        resolve(directives, &self.agent, path)
    }
}

/// Decide whether `agent` may use `path` under `directives`. Total: every
/// input produces a decision.
pub fn resolve(directives: DirectiveTable, agent: &AgentIdentity, path: &str) -> AccessDecision {
    let reason = decide(&directives, agent, path);
    AccessDecision {
        allowed: reason == Reason::AllowPrefix,
        path: path.to_string(),
        directives,
        reason,
    }
}

fn decide(directives: &DirectiveTable, agent: &AgentIdentity, path: &str) -> Reason {
    let ua = directives.get(Directive::UserAgent).unwrap_or("");
    if !agent.matches(ua) {
        return Reason::AgentNotMatched;
    }
    if prefix_of(directives.get(Directive::Disallow), path) {
        return Reason::DisallowPrefix;
    }
    if prefix_of(directives.get(Directive::Allow), path) {
        return Reason::AllowPrefix;
    }
    Reason::DefaultDeny
}

/// Raw string prefix match; an empty rule value counts as absent.
fn prefix_of(rule: Option<&str>, path: &str) -> bool {
    matches!(rule, Some(prefix) if !prefix.is_empty() && path.starts_with(prefix))
}
