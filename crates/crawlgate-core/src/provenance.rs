//! Provenance records: one line of the append-only decision log.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolve::{AccessDecision, Reason};

/// Audit record of a single access decision.
///
/// Serialized as one JSON object per line. The field set is a stable external
/// format; `reason` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub url: String,
    /// ISO 8601 UTC timestamp.
    pub checked_at: DateTime<Utc>,
    pub allowed: bool,
    #[serde(default)]
    pub directives: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,
}

impl ProvenanceRecord {
    pub fn from_decision(decision: &AccessDecision, url: &str, checked_at: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            checked_at,
            allowed: decision.allowed,
            directives: decision.directives.to_map(),
            reason: Some(decision.reason),
        }
    }

    /// Encode as a single newline-terminated JSON line.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentIdentity, DirectiveTable, parse_directives, resolve};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap()
    }

    #[test]
    fn record_copies_decision_fields() {
        let table = parse_directives("User-agent: AI-Training-Crawler\nAllow: /blog");
        let decision = resolve(table, &AgentIdentity::default(), "/blog/article1");
        let record =
            ProvenanceRecord::from_decision(&decision, "http://127.0.0.1:5000/blog/article1", fixed_time());
        assert_eq!(record.url, "http://127.0.0.1:5000/blog/article1");
        assert!(record.allowed);
        assert_eq!(record.reason, Some(Reason::AllowPrefix));
        assert_eq!(record.directives.get("Allow").map(String::as_str), Some("/blog"));
    }

    #[test]
    fn json_line_shape() {
        let decision = resolve(DirectiveTable::new(), &AgentIdentity::default(), "/");
        let record = ProvenanceRecord::from_decision(&decision, "http://example.com/", fixed_time());
        let line = record.to_json_line().unwrap();

        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        assert_eq!(
            line,
            "{\"url\":\"http://example.com/\",\"checked_at\":\"2026-02-21T10:00:00Z\",\
             \"allowed\":false,\"directives\":{},\"reason\":\"agent-not-matched\"}\n"
        );
    }

    #[test]
    fn reason_is_optional_on_read() {
        let json = r#"{"url":"http://a/","checked_at":"2026-02-21T10:00:00.123Z","allowed":true,"directives":{"User-agent":"X"}}"#;
        let record: ProvenanceRecord = serde_json::from_str(json).unwrap();
        assert!(record.reason.is_none());
        assert!(record.allowed);

        let line = record.to_json_line().unwrap();
        assert!(!line.contains("reason"));
    }

    #[test]
    fn json_line_roundtrip_preserves_values() {
        let table = parse_directives("User-agent: AI-Training-Crawler\nDisallow: /private\nAllow: /");
        let decision = resolve(table, &AgentIdentity::default(), "/private/doc");
        let record = ProvenanceRecord::from_decision(&decision, "https://site.test/private/doc", Utc::now());

        let line = record.to_json_line().unwrap();
        let parsed: ProvenanceRecord = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, record);
    }
}
