use once_cell::sync::Lazy;
use regex::Regex;

static DEATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(died|is dead|was found dead|passed away|death)\b").unwrap());

static CAPITALIZED_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][a-zA-Z]+\b").unwrap());

static STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "has", "have", "had", "that", "this", "of",
    "in", "on", "at", "to", "for", "and", "or", "it", "with", "as", "by", "from",
];

/// Build up to `max_queries` search queries for a claim: a keyword-reduced
/// query followed by the raw claim text, deduplicated while preserving
/// order. A focused "Name death" query is appended for death-type claims
/// to keep the main entity from being lost behind generic hoax-debunk
/// results.
pub fn build_search_queries(claim_text: &str, max_queries: usize) -> Vec<String> {
    let mut queries = Vec::new();

    let keyword_query = reduce_to_keywords(claim_text);
    if !keyword_query.is_empty() && keyword_query != claim_text {
        queries.push(keyword_query);
    }
    queries.push(claim_text.to_string());

    queries = maybe_add_death_query(claim_text, queries);
    dedupe_preserve_order(queries)
        .into_iter()
        .take(max_queries.max(1))
        .collect()
}

fn reduce_to_keywords(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !STOPWORDS.contains(&token.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn maybe_add_death_query(claim_text: &str, mut queries: Vec<String>) -> Vec<String> {
    if !DEATH_PATTERN.is_match(claim_text) {
        return queries;
    }

    let name_tokens: Vec<&str> = CAPITALIZED_TOKEN.find_iter(claim_text).map(|m| m.as_str()).collect();
    if name_tokens.is_empty() {
        return queries;
    }

    let death_query = format!("{} death", name_tokens.join(" "));
    if !queries.contains(&death_query) {
        queries.push(death_query);
    }
    queries
}

fn dedupe_preserve_order(queries: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    queries.into_iter().filter(|q| seen.insert(q.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_includes_raw_claim_text() {
        let queries = build_search_queries("Scientists discovered a cure", 2);
        assert!(queries.contains(&"Scientists discovered a cure".to_string()));
    }

    #[test]
    fn adds_focused_death_query_for_death_claims() {
        let queries = build_search_queries("Amitabh Bachchan has died in hospital today", 3);
        assert!(queries.iter().any(|q| q.ends_with("death")));
    }

    #[test]
    fn skips_death_query_without_death_language() {
        let queries = build_search_queries("Hot water destroys the coronavirus", 3);
        assert!(!queries.iter().any(|q| q.ends_with("death")));
    }

    #[test]
    fn respects_max_queries_cap() {
        let queries = build_search_queries("Amitabh Bachchan has died in hospital today", 1);
        assert_eq!(queries.len(), 1);
    }
}
