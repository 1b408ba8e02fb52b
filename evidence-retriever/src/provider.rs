use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

use crate::domains::extract_domain;
use crate::types::EvidenceResult;

#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    BadStatus(u16),
}

/// Performs a web search and returns raw results, unscored and
/// unfiltered. `EvidenceRetriever` applies authoritative-domain scoring
/// and deduplication on top.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<EvidenceResult>, RetrieverError>;
}

/// Fetches and extracts the main text content of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, max_chars: usize) -> Result<String, RetrieverError>;
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Searches DuckDuckGo's HTML-only endpoint (no JS, no API key) and
/// scrapes the result list. This is the fallback path the original
/// library falls back to when no hosted search API is available, used
/// here as the primary (and only) implementation.
pub struct DuckDuckGoHtmlProvider {
    client: reqwest::Client,
}

impl Default for DuckDuckGoHtmlProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoHtmlProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("failed to build http client"),
        }
    }

    fn extract_ddg_redirect(href: &str) -> String {
        if let Ok(parsed) = url::Url::parse(href).or_else(|_| url::Url::parse(&format!("https://duckduckgo.com{href}"))) {
            if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
                return target.to_string();
            }
        }
        href.to_string()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoHtmlProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<EvidenceResult>, RetrieverError> {
        let response = self
            .client
            .post("https://html.duckduckgo.com/html/")
            .form(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RetrieverError::BadStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let document = Html::parse_document(&body);

        let result_sel = Selector::parse(".result").unwrap();
        let title_sel = Selector::parse(".result__title a").unwrap();
        let url_sel = Selector::parse(".result__url").unwrap();
        let snippet_sel = Selector::parse(".result__snippet").unwrap();

        let mut results = Vec::new();
        for node in document.select(&result_sel) {
            let Some(title_el) = node.select(&title_sel).next() else {
                continue;
            };
            let href = title_el.value().attr("href").unwrap_or_default();
            if href.is_empty() {
                continue;
            }
            let actual_url = Self::extract_ddg_redirect(href);
            let title: String = title_el.text().collect::<String>().trim().to_string();
            let snippet: String = node
                .select(&snippet_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let source_name = if let Some(url_el) = node.select(&url_sel).next() {
                url_el.text().collect::<String>().trim().to_string()
            } else {
                extract_domain(&actual_url)
            };

            results.push(EvidenceResult::new(actual_url, title, snippet, source_name));
            if results.len() >= max_results {
                break;
            }
        }

        Ok(results)
    }
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Fetches a page over HTTP and extracts readable text, stripping
/// script/style/nav/header/footer/aside elements the way a browser
/// reader-mode view would.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("failed to build http client"),
        }
    }
}

const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, max_chars: usize) -> Result<String, RetrieverError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(RetrieverError::BadStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let document = Html::parse_document(&body);

        // scraper has no DOM-mutation API, so instead of removing stripped
        // elements we collect the node ids under them and skip any text
        // node whose ancestry passes through one.
        let stripped_tags: std::collections::HashSet<&str> = STRIPPED_TAGS.iter().copied().collect();
        let mut stripped_ids = std::collections::HashSet::new();
        for element in document.root_element().descendants() {
            if let Some(el) = scraper::ElementRef::wrap(element) {
                if stripped_tags.contains(el.value().name()) {
                    for descendant in element.descendants() {
                        stripped_ids.insert(descendant.id());
                    }
                }
            }
        }

        let mut text = String::new();
        for node in document.root_element().descendants() {
            if stripped_ids.contains(&node.id()) {
                continue;
            }
            if let Some(fragment) = node.value().as_text() {
                text.push_str(fragment);
                text.push(' ');
            }
        }

        let collapsed = WHITESPACE.replace_all(text.trim(), " ").to_string();
        let truncated: String = collapsed.chars().take(max_chars).collect();
        Ok(truncated)
    }
}
