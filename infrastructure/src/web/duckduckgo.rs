//! DuckDuckGo HTML search as an [`ExternalFetcher`].
//!
//! Queries the no-JavaScript results page (no API key required) and scrapes
//! each result's title, target URL and snippet.

use async_trait::async_trait;
use concierge_application::{ExternalFetcher, FetchError};
use concierge_domain::WebSnippet;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// DuckDuckGo HTML endpoint.
const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Maximum response body size (2 MB)
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

static RESULT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result").expect("result selector"));
static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("title selector"));
static SNIPPET_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("snippet selector"));

/// Fetcher backed by DuckDuckGo's HTML results page
pub struct DuckDuckGoFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: DDG_HTML_URL.to_string(),
        })
    }

    /// Point at a different results endpoint (mirrors, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ExternalFetcher for DuckDuckGoFetcher {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<WebSnippet>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Request(format!(
                "search returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(format!("failed to read body: {}", e)))?;
        if body.len() > MAX_BODY_SIZE {
            return Err(FetchError::Parse(format!(
                "response too large: {} bytes",
                body.len()
            )));
        }

        let snippets = parse_results(&String::from_utf8_lossy(&body), max_results);
        debug!(query, results = snippets.len(), "Web search");
        Ok(snippets)
    }
}

/// Extract up to `max_results` snippets from a results page.
fn parse_results(html: &str, max_results: usize) -> Vec<WebSnippet> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_SEL)
        .filter_map(|result| {
            let anchor = result.select(&TITLE_SEL).next()?;
            let title = collapse(anchor);
            let url = resolve_href(anchor.value().attr("href")?)?;
            let snippet = result
                .select(&SNIPPET_SEL)
                .next()
                .map(collapse)
                .unwrap_or_default();
            (!title.is_empty()).then_some(WebSnippet {
                title,
                url,
                snippet,
            })
        })
        .take(max_results)
        .collect()
}

fn collapse(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result links go through a redirect carrying the target in `uddg`.
fn resolve_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let url = reqwest::Url::parse(&absolute).ok()?;
    let target = url
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned());
    Some(target.unwrap_or(absolute))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div class="result results_links">
    <h2 class="result__title">
      <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.example.com%2Fparis&amp;rut=abc">
        Paris <b>Travel</b> Guide
      </a>
    </h2>
    <a class="result__snippet">Best time to visit Paris is spring.</a>
  </div>
  <div class="result results_links">
    <a class="result__a" href="https://direct.example.org/tips">Paris tips</a>
  </div>
  <div class="result results_links">
    <a class="result__a" href="https://third.example.org/">Third</a>
    <a class="result__snippet">More.</a>
  </div>
</body></html>
"#;

    #[test]
    fn test_parse_results() {
        let results = parse_results(PAGE, 5);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Paris Travel Guide");
        assert_eq!(results[0].url, "https://www.example.com/paris");
        assert_eq!(results[0].snippet, "Best time to visit Paris is spring.");
        assert_eq!(results[1].url, "https://direct.example.org/tips");
        assert!(results[1].snippet.is_empty());
    }

    #[test]
    fn test_parse_results_respects_max() {
        assert_eq!(parse_results(PAGE, 1).len(), 1);
        assert!(parse_results("<html><body>No results.</body></html>", 5).is_empty());
    }
}
