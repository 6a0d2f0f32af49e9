//! HTTP policy fetcher.
//!
//! Issues a single GET for `{scheme}://{authority}/robots.txt` with a bounded
//! timeout. There are no retries and no caching; every failure is folded into
//! the returned document's status.

use std::time::Duration;

use async_trait::async_trait;
use crawlgate_core::{AgentIdentity, FetchStatus, PolicyDocument};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::PolicySource;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Tunables for [`PolicyFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request deadline, connect through body.
    pub timeout: Duration,
    /// Bodies longer than this are cut back to the last complete line within
    /// the limit before parsing.
    pub max_body_bytes: usize,
}

impl FetchConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_BODY_BYTES: usize = 512 * 1024;
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Fetches robots.txt on behalf of one crawler identity.
pub struct PolicyFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

/// Derive the robots.txt location for `url`.
///
/// Keeps scheme, host and explicit port; drops credentials, path, query and
/// fragment. Returns `None` for non-HTTP(S) URLs or URLs without a host.
pub fn robots_url(url: &Url) -> Option<Url> {
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    robots.set_username("").ok()?;
    robots.set_password(None).ok()?;
    Some(robots)
}

/// `host[:port]` for logging and the document's host field.
fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

impl PolicyFetcher {
    /// Build a fetcher whose `User-Agent` header is `agent`.
    pub fn new(agent: AgentIdentity, config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch the policy document governing `url`. Never fails.
    pub async fn fetch(&self, url: &Url) -> PolicyDocument {
        let host = authority(url);
        let Some(robots) = robots_url(url) else {
            warn!(url = %url, "no robots.txt location for URL");
            return PolicyDocument::failed(host, FetchStatus::Error);
        };

        match self.get_text(&robots).await {
            Ok(text) => {
                info!(url = %robots, bytes = text.len(), "fetched policy");
                PolicyDocument::ok(host, text)
            }
            Err(status) => PolicyDocument::failed(host, status),
        }
    }

    async fn get_text(&self, robots: &Url) -> Result<String, FetchStatus> {
        let mut resp = self
            .client
            .get(robots.clone())
            .send()
            .await
            .map_err(|e| classify(robots, &e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %robots, status = status.as_u16(), "policy unavailable");
            return Err(FetchStatus::Unavailable);
        }

        let limit = self.config.max_body_bytes;
        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = resp.chunk().await.map_err(|e| classify(robots, &e))? {
            let room = limit - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        if truncated {
            // A partial last line could shorten an Allow prefix; keep whole lines only.
            match body.iter().rposition(|&b| b == b'\n') {
                Some(end) => body.truncate(end + 1),
                None => body.clear(),
            }
            warn!(url = %robots, limit, kept = body.len(), "policy body truncated");
        }

        let text = String::from_utf8_lossy(&body).into_owned();
        Ok(match text.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }
}

fn classify(robots: &Url, err: &reqwest::Error) -> FetchStatus {
    if err.is_timeout() {
        warn!(url = %robots, error = %err, "policy fetch timed out");
        FetchStatus::Timeout
    } else {
        warn!(url = %robots, error = %err, "policy fetch failed");
        FetchStatus::Error
    }
}

#[async_trait]
impl PolicySource for PolicyFetcher {
    async fn fetch_policy(&self, url: &Url) -> PolicyDocument {
        self.fetch(url).await
    }
}
