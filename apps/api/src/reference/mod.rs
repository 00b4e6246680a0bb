//! Reference lookup — "has someone already built this?"
//!
//! Searches public repositories by title and tech stack and returns the top
//! hit. Any failure or empty result degrades to a plain web-search link, so a
//! lookup never errors out.

pub mod handlers;

use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::{OutboundRequest, Transport};

pub const REPOSITORY_SEARCH_URL: &str = "https://api.github.com/search/repositories";
pub const WEB_SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    Repository,
    WebSearch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLink {
    pub url: String,
    pub source: ReferenceSource,
    /// `owner/name` of the matched repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    html_url: String,
    full_name: Option<String>,
}

#[derive(Clone)]
pub struct ReferenceFinder {
    transport: Arc<dyn Transport>,
    search_url: Url,
    web_search_url: Url,
}

impl ReferenceFinder {
    pub fn new(transport: Arc<dyn Transport>, search_url: Url, web_search_url: Url) -> Self {
        Self {
            transport,
            search_url,
            web_search_url,
        }
    }

    pub async fn find(&self, title: &str, tech_stack: &[String]) -> ReferenceLink {
        let query = search_terms(title, tech_stack);

        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("sort", "stars")
            .append_pair("order", "desc")
            .append_pair("per_page", "1");
        let request =
            OutboundRequest::get(url).with_header("Accept", "application/vnd.github+json");

        let top = match self.transport.send(request).await {
            Ok(body) => match serde_json::from_value::<SearchResponse>(body) {
                Ok(found) => found.items.into_iter().next(),
                Err(e) => {
                    warn!("Unexpected repository search response: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("Repository search failed: {e}");
                None
            }
        };

        match top {
            Some(item) => {
                info!("Reference for '{title}': {}", item.html_url);
                ReferenceLink {
                    url: item.html_url,
                    source: ReferenceSource::Repository,
                    name: item.full_name,
                }
            }
            None => self.web_search(&query),
        }
    }

    fn web_search(&self, query: &str) -> ReferenceLink {
        let mut url = self.web_search_url.clone();
        url.query_pairs_mut().append_pair("q", &format!("{query} github"));
        ReferenceLink {
            url: url.to_string(),
            source: ReferenceSource::WebSearch,
            name: None,
        }
    }
}

fn search_terms(title: &str, tech_stack: &[String]) -> String {
    std::iter::once(title)
        .chain(tech_stack.iter().map(String::as_str))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestions::generator::tests::FakeTransport;
    use serde_json::json;

    fn finder(transport: Arc<FakeTransport>) -> ReferenceFinder {
        ReferenceFinder::new(
            transport,
            Url::parse(REPOSITORY_SEARCH_URL).unwrap(),
            Url::parse(WEB_SEARCH_URL).unwrap(),
        )
    }

    fn stack() -> Vec<String> {
        vec!["Rust".to_string(), "WebAssembly".to_string()]
    }

    #[test]
    fn test_search_terms_join_title_and_stack() {
        assert_eq!(search_terms(" Pixel Editor ", &stack()), "Pixel Editor Rust WebAssembly");
        assert_eq!(search_terms("Solo", &[]), "Solo");
    }

    #[tokio::test]
    async fn test_top_repository_is_returned() {
        let transport = FakeTransport::replying(json!({
            "total_count": 1,
            "items": [{ "html_url": "https://github.com/acme/pixel", "full_name": "acme/pixel" }]
        }));
        let link = finder(transport.clone()).find("Pixel Editor", &stack()).await;

        assert_eq!(link.source, ReferenceSource::Repository);
        assert_eq!(link.url, "https://github.com/acme/pixel");
        assert_eq!(link.name.as_deref(), Some("acme/pixel"));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(
            sent[0].query_param("q").as_deref(),
            Some("Pixel Editor Rust WebAssembly")
        );
        assert_eq!(sent[0].query_param("per_page").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_no_results_falls_back_to_web_search() {
        let transport = FakeTransport::replying(json!({ "total_count": 0, "items": [] }));
        let link = finder(transport).find("Pixel Editor", &stack()).await;

        assert_eq!(link.source, ReferenceSource::WebSearch);
        let url = Url::parse(&link.url).unwrap();
        assert_eq!(url.host_str(), Some("www.google.com"));
        let q = url.query_pairs().find(|(k, _)| k == "q").unwrap().1.into_owned();
        assert_eq!(q, "Pixel Editor Rust WebAssembly github");
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_web_search() {
        let link = finder(FakeTransport::failing(403)).find("Pixel Editor", &stack()).await;
        assert_eq!(link.source, ReferenceSource::WebSearch);
    }
}
