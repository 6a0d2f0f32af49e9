//! Policy fetch layer: retrieves `robots.txt` for a target URL's host.

pub mod http;

pub use http::{FetchConfig, FetchError, PolicyFetcher, robots_url};

use async_trait::async_trait;
use crawlgate_core::PolicyDocument;
use url::Url;

/// Anything that can produce the policy document governing a URL.
///
/// Implementations never fail: an unreachable policy is reported through the
/// document's [`FetchStatus`](crawlgate_core::FetchStatus).
#[async_trait]
pub trait PolicySource: Send + Sync {
    async fn fetch_policy(&self, url: &Url) -> PolicyDocument;
}
