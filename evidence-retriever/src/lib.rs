//! Web evidence search and page-fetching against an authoritative-domain
//! allowlist.

mod domains;
mod provider;
mod queries;
mod retriever;
mod types;

pub use domains::{extract_domain, is_authoritative_domain};
pub use provider::{DuckDuckGoHtmlProvider, HttpPageFetcher, PageFetcher, RetrieverError, SearchProvider};
pub use queries::build_search_queries;
pub use retriever::EvidenceRetriever;
pub use types::EvidenceResult;
