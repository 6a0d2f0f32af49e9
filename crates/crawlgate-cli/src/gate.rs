//! Access gate: composes fetch, parse, resolve and record for one URL.

use std::sync::Arc;

use crawlgate_core::{
    AccessDecision, AgentIdentity, DirectiveTable, FetchStatus, PolicyDocument, Resolver,
    parse_directives,
};
use crawlgate_fetch::{FetchConfig, FetchError, PolicyFetcher, PolicySource};
use crawlgate_store::{LogSink, ProvenanceRecorder, StoreError};
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum GateError {
    /// The decision was made but its provenance record could not be stored.
    #[error("failed to persist provenance record for {url}: {source}")]
    Persistence {
        url: String,
        decision: AccessDecision,
        #[source]
        source: StoreError,
    },
}

impl GateError {
    /// The decision reached before the failure.
    pub fn decision(&self) -> &AccessDecision {
        match self {
            Self::Persistence { decision, .. } => decision,
        }
    }
}

/// Decides and records crawl permission for URLs.
///
/// Holds no per-request state, so one gate can be shared by a pool of
/// workers. Dropping a pending [`check_and_record`](Self::check_and_record)
/// future cancels its policy fetch.
pub struct Gate<S> {
    source: S,
    resolver: Resolver,
    recorder: ProvenanceRecorder,
}

impl Gate<PolicyFetcher> {
    /// Gate backed by an HTTP fetcher. `agent` is used both as the
    /// `User-Agent` header and as the identity matched against policies.
    pub fn http(
        agent: AgentIdentity,
        config: FetchConfig,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, FetchError> {
        let fetcher = PolicyFetcher::new(agent.clone(), config)?;
        Ok(Self::new(fetcher, agent, sink))
    }
}

impl<S: PolicySource> Gate<S> {
    pub fn new(source: S, agent: AgentIdentity, sink: Arc<dyn LogSink>) -> Self {
        Self {
            source,
            resolver: Resolver::new(agent),
            recorder: ProvenanceRecorder::new(sink),
        }
    }

    pub fn agent(&self) -> &AgentIdentity {
        self.resolver.agent()
    }

    /// Fetch the site's policy, resolve access for the URL's path and append
    /// a provenance record.
    ///
    /// Network and parse problems resolve to a deny and are still recorded.
    /// Only a failed append is returned as an error, and it carries the decision.
    pub async fn check_and_record(&self, url: &str) -> Result<AccessDecision, GateError> {
        let (doc, path) = match Url::parse(url) {
            Ok(parsed) => (self.source.fetch_policy(&parsed).await, parsed.path().to_string()),
            Err(e) => {
                warn!(url, error = %e, "unparseable URL; no policy can be fetched");
                (PolicyDocument::failed("", FetchStatus::Error), String::new())
            }
        };

        let directives = directives_for(&doc);
        let decision = self.resolver.resolve(directives, &path);
        debug!(
            url,
            path = %decision.path,
            allowed = decision.allowed,
            reason = %decision.reason,
            "resolved access"
        );

        let recorder = self.recorder.clone();
        let pending = decision.clone();
        let target = url.to_string();
        let appended = tokio::task::spawn_blocking(move || recorder.record(&pending, &target))
            .await
            .unwrap_or_else(|e| Err(StoreError::Other(format!("append task failed: {e}"))));

        match appended {
            Ok(_) => Ok(decision),
            Err(source) => Err(GateError::Persistence {
                url: url.to_string(),
                decision,
                source,
            }),
        }
    }

    /// Check several URLs concurrently. Results are in input order.
    pub async fn check_many<U: AsRef<str>>(
        &self,
        urls: &[U],
    ) -> Vec<Result<AccessDecision, GateError>> {
        join_all(urls.iter().map(|u| self.check_and_record(u.as_ref()))).await
    }
}

fn directives_for(doc: &PolicyDocument) -> DirectiveTable {
    match doc.text() {
        Some(text) => parse_directives(text),
        None => {
            warn!(
                host = doc.host(),
                status = %doc.status(),
                fetched_at = %doc.fetched_at(),
                "no policy available; resolving without directives"
            );
            DirectiveTable::new()
        }
    }
}
