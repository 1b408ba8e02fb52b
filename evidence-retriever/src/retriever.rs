use std::collections::HashSet;
use std::sync::Arc;

use resilience::{retry, RetryConfig};
use tracing::info;

use crate::domains::is_authoritative_domain;
use crate::provider::{PageFetcher, RetrieverError, SearchProvider};
use crate::queries::build_search_queries;
use crate::types::EvidenceResult;

/// Searches for and scores evidence related to a claim, then (optionally)
/// fetches full page text for the top results.
pub struct EvidenceRetriever {
    search_provider: Arc<dyn SearchProvider>,
    page_fetcher: Arc<dyn PageFetcher>,
    authoritative_domains: Vec<String>,
    retry_config: RetryConfig,
}

impl EvidenceRetriever {
    pub fn new(
        search_provider: Arc<dyn SearchProvider>,
        page_fetcher: Arc<dyn PageFetcher>,
        authoritative_domains: Vec<String>,
    ) -> Self {
        Self {
            search_provider,
            page_fetcher,
            authoritative_domains,
            retry_config: RetryConfig::default(),
        }
    }

    /// Run a single query through the search provider and score results
    /// by whether they come from an authoritative domain.
    async fn search_and_score(&self, query: &str, max_results: usize) -> Result<Vec<EvidenceResult>, RetrieverError> {
        let provider = Arc::clone(&self.search_provider);
        let query_owned = query.to_string();
        let raw = retry(
            move || {
                let provider = Arc::clone(&provider);
                let query = query_owned.clone();
                Box::pin(async move { provider.search(&query, max_results * 3).await })
            },
            self.retry_config.clone(),
        )
        .await
        .map_err(|_| RetrieverError::BadStatus(0))?;

        let mut scored: Vec<EvidenceResult> = raw
            .into_iter()
            .map(|mut result| {
                result.relevance_score = if is_authoritative_domain(&result.url, &self.authoritative_domains) {
                    1.0
                } else {
                    0.5
                };
                result
            })
            .collect();

        scored.sort_by(|a, b| b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(max_results);
        Ok(scored)
    }

    /// Build search queries for `claim_text`, search with each, dedupe the
    /// combined results by URL, and return them sorted with authoritative
    /// sources first.
    pub async fn gather_evidence(&self, claim_text: &str, max_queries: usize, max_results: usize) -> Vec<EvidenceResult> {
        let queries = build_search_queries(claim_text, max_queries);
        info!(?queries, "evidence search queries");

        let mut all_results = Vec::new();
        for query in &queries {
            match self.search_and_score(query, 5).await {
                Ok(results) => all_results.extend(results),
                Err(error) => tracing::warn!(%error, query, "evidence search failed for query"),
            }
        }

        if all_results.is_empty() {
            if let Ok(fallback) = self.search_and_score(claim_text, max_results).await {
                all_results = fallback;
            }
        }

        let mut seen = HashSet::new();
        let mut unique: Vec<EvidenceResult> = all_results.into_iter().filter(|r| seen.insert(r.url.clone())).collect();
        unique.sort_by(|a, b| b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(std::cmp::Ordering::Equal));
        unique.truncate(max_results);
        unique
    }

    pub async fn fetch_page(&self, url: &str, max_chars: usize) -> Result<String, RetrieverError> {
        self.page_fetcher.fetch(url, max_chars).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubProvider {
        results: Vec<EvidenceResult>,
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<EvidenceResult>, RetrieverError> {
            Ok(self.results.clone())
        }
    }

    struct StubFetcher {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str, _max_chars: usize) -> Result<String, RetrieverError> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok("page text".to_string())
        }
    }

    fn evidence(url: &str) -> EvidenceResult {
        EvidenceResult::new(url.to_string(), "title".to_string(), "snippet".to_string(), "source".to_string())
    }

    #[tokio::test]
    async fn gather_evidence_dedupes_by_url_across_queries() {
        let provider = Arc::new(StubProvider {
            results: vec![evidence("https://who.int/a"), evidence("https://who.int/a")],
        });
        let fetcher = Arc::new(StubFetcher { calls: Mutex::new(vec![]) });
        let retriever = EvidenceRetriever::new(provider, fetcher, vec!["who.int".to_string()]);

        let results = retriever.gather_evidence("some claim", 2, 10).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn authoritative_domains_score_higher() {
        let provider = Arc::new(StubProvider {
            results: vec![evidence("https://who.int/a"), evidence("https://example.com/b")],
        });
        let fetcher = Arc::new(StubFetcher { calls: Mutex::new(vec![]) });
        let retriever = EvidenceRetriever::new(provider, fetcher, vec!["who.int".to_string()]);

        let results = retriever.gather_evidence("some claim", 1, 10).await;
        assert!(results[0].relevance_score >= results.last().unwrap().relevance_score);
    }
}
