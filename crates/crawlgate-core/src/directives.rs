//! Lenient robots.txt directive parsing.
//!
//! Produces a flat, last-seen-wins table of the directives crawlgate cares
//! about. Unknown directives, comments and malformed lines are skipped, so
//! parsing never fails.
//!
//! # Recognized directives
//!
//! - `User-agent`
//! - `Allow`
//! - `Disallow`
//! - `AI-Training` (agent-scoped training permission extension)
//!
//! Names are matched case-insensitively; values are kept verbatim after
//! trimming and are not validated.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::trace;

/// A directive key recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Directive {
    #[serde(rename = "User-agent")]
    UserAgent,
    #[serde(rename = "Allow")]
    Allow,
    #[serde(rename = "Disallow")]
    Disallow,
    #[serde(rename = "AI-Training")]
    AiTraining,
}

impl Directive {
    pub const ALL: [Directive; 4] = [
        Directive::UserAgent,
        Directive::Allow,
        Directive::Disallow,
        Directive::AiTraining,
    ];

    /// Canonical spelling, used as the key in provenance records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserAgent => "User-agent",
            Self::Allow => "Allow",
            Self::Disallow => "Disallow",
            Self::AiTraining => "AI-Training",
        }
    }

    /// Case-insensitive lookup of a directive name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat directive mapping for a single agent scope.
///
/// An empty table means "no explicit directives"; the resolver's default
/// policy applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectiveTable {
    entries: BTreeMap<Directive, String>,
}

impl DirectiveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, directive: Directive) -> Option<&str> {
        self.entries.get(&directive).map(String::as_str)
    }

    /// Insert a value, replacing any earlier one.
    pub fn set(&mut self, directive: Directive, value: impl Into<String>) {
        self.entries.insert(directive, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Directive, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// String-keyed view using canonical directive names.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }
}

impl<const N: usize> From<[(Directive, &str); N]> for DirectiveTable {
    fn from(pairs: [(Directive, &str); N]) -> Self {
        let mut table = Self::new();
        for (directive, value) in pairs {
            table.set(directive, value);
        }
        table
    }
}

/// Parse robots.txt text into a [`DirectiveTable`].
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings. Each line is trimmed;
/// blank lines and `#` comments are skipped. The name is everything before the
/// first `:`, the value everything after it. A repeated directive overwrites
/// the earlier value.
pub fn parse_directives(text: &str) -> DirectiveTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut table = DirectiveTable::new();

    for (lineno, raw) in text.split(['\n', '\r']).enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            trace!(lineno, line, "skipping line without directive separator");
            continue;
        };
        match Directive::from_name(name.trim()) {
            Some(directive) => table.set(directive, value.trim()),
            None => trace!(lineno, name = name.trim(), "skipping unrecognized directive"),
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# robots.txt for example.com
User-agent: AI-Training-Crawler
Disallow: /private
Allow: /
AI-Training: allow
Crawl-delay: 10
Sitemap: https://example.com/sitemap.xml
";

    #[test]
    fn parses_recognized_directives() {
        let table = parse_directives(SAMPLE);
        assert_eq!(table.get(Directive::UserAgent), Some("AI-Training-Crawler"));
        assert_eq!(table.get(Directive::Disallow), Some("/private"));
        assert_eq!(table.get(Directive::Allow), Some("/"));
        assert_eq!(table.get(Directive::AiTraining), Some("allow"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(parse_directives("").is_empty());
        assert!(parse_directives("\n\n   \r\n").is_empty());
        assert!(parse_directives("# only a comment\n#another").is_empty());
    }

    #[test]
    fn garbage_never_fails() {
        let inputs = [
            ":::",
            "no colon here",
            ": value without name",
            "\u{0}\u{1}binary:junk",
            "User-agent",
            "Disallow : ",
            "😀: 😀",
        ];
        for input in inputs {
            let table = parse_directives(input);
            for (directive, value) in table.iter() {
                assert!(Directive::ALL.contains(&directive));
                assert_eq!(value, value.trim());
            }
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        let table = parse_directives("user-AGENT: Bot\nDISALLOW: /x\nallow: /y\nai-training: no");
        assert_eq!(table.get(Directive::UserAgent), Some("Bot"));
        assert_eq!(table.get(Directive::Disallow), Some("/x"));
        assert_eq!(table.get(Directive::Allow), Some("/y"));
        assert_eq!(table.get(Directive::AiTraining), Some("no"));
    }

    #[test]
    fn splits_on_first_colon_only() {
        let table = parse_directives("Allow: /a:b:c\nAI-Training: scope: research");
        assert_eq!(table.get(Directive::Allow), Some("/a:b:c"));
        assert_eq!(table.get(Directive::AiTraining), Some("scope: research"));
    }

    #[test]
    fn whitespace_around_name_and_value_trimmed() {
        let table = parse_directives("   User-agent   :   Bot   \n\tDisallow\t:\t/tmp\t");
        assert_eq!(table.get(Directive::UserAgent), Some("Bot"));
        assert_eq!(table.get(Directive::Disallow), Some("/tmp"));
    }

    #[test]
    fn all_line_endings() {
        let unix = parse_directives("User-agent: A\nAllow: /a\n");
        let windows = parse_directives("User-agent: A\r\nAllow: /a\r\n");
        let classic_mac = parse_directives("User-agent: A\rAllow: /a\r");
        assert_eq!(unix, windows);
        assert_eq!(unix, classic_mac);
        assert_eq!(unix.len(), 2);
    }

    #[test]
    fn last_seen_wins() {
        let table = parse_directives(
            "User-agent: First\nDisallow: /one\nUser-agent: Second\nDisallow: /two",
        );
        assert_eq!(table.get(Directive::UserAgent), Some("Second"));
        assert_eq!(table.get(Directive::Disallow), Some("/two"));
    }

    #[test]
    fn comment_lines_skipped_but_inline_hash_kept() {
        let table = parse_directives("  # Disallow: /hidden\nDisallow: /tmp # scratch");
        assert_eq!(table.get(Directive::Disallow), Some("/tmp # scratch"));
    }

    #[test]
    fn prefix_lookalikes_ignored() {
        let table = parse_directives("Disallowed: /x\nUser-agents: Bot\nAI-Training-Extra: yes");
        assert!(table.is_empty());
    }

    #[test]
    fn empty_value_kept() {
        let table = parse_directives("Disallow:");
        assert_eq!(table.get(Directive::Disallow), Some(""));
    }

    #[test]
    fn byte_order_mark_stripped() {
        let table = parse_directives("\u{feff}User-agent: Bot");
        assert_eq!(table.get(Directive::UserAgent), Some("Bot"));
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_directives(SAMPLE), parse_directives(SAMPLE));
    }

    #[test]
    fn to_map_uses_canonical_names() {
        let table = parse_directives("user-agent: Bot\nai-training: allow");
        let map = table.to_map();
        assert_eq!(map.get("User-agent").map(String::as_str), Some("Bot"));
        assert_eq!(map.get("AI-Training").map(String::as_str), Some("allow"));
    }

    #[test]
    fn serializes_as_string_map() {
        let table = DirectiveTable::from([(Directive::UserAgent, "Bot"), (Directive::Allow, "/")]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"User-agent":"Bot","Allow":"/"}"#);
    }
}
