//! Canonicalization: strip forwarding noise and normalize whitespace so
//! near-duplicate messages collapse to the same canonical text before
//! embedding.

use once_cell::sync::Lazy;
use regex::Regex;

static FORWARD_PREFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^(fwd?|fw|forwarded?|shared?):\s*").unwrap(),
        Regex::new(r"(?i)^(re|reply):\s*").unwrap(),
        Regex::new(r"(?i)^\*+\s*forwarded\s+message\s*\*+\s*").unwrap(),
        Regex::new(r"(?i)^-+\s*forwarded\s+message\s*-+\s*").unwrap(),
    ]
});

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static WWW_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"www\.\S+").unwrap());

static CTA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(share|forward|send)\s+(this|to|with)\s+.{0,50}$").unwrap(),
        Regex::new(r"(?i)\b(please|pls)\s+(share|forward|spread)\b").unwrap(),
        Regex::new(r"(?i)\b(must|have to|should)\s+(read|watch|see|share)\b").unwrap(),
        Regex::new(r"(?i)(spread\s+the\s+word|pass\s+it\s+on)").unwrap(),
    ]
});

static REPEATED_BANG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!?]{2,}").unwrap());
static REPEATED_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Strips emoji from the common pictograph/emoticon/transport/flag
/// Unicode blocks.
fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            let cp = c as u32;
            !((0x1F600..=0x1F64F).contains(&cp)
                || (0x1F300..=0x1F5FF).contains(&cp)
                || (0x1F680..=0x1F6FF).contains(&cp)
                || (0x1F1E0..=0x1F1FF).contains(&cp))
        })
        .collect()
}

pub fn extract_canonical_claim(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut canonical = text.trim().to_string();

    for prefix in FORWARD_PREFIXES.iter() {
        canonical = prefix.replace(&canonical, "").into_owned();
    }

    canonical = URL_PATTERN.replace_all(&canonical, "").into_owned();
    canonical = WWW_PATTERN.replace_all(&canonical, "").into_owned();

    for cta in CTA_PATTERNS.iter() {
        canonical = cta.replace_all(&canonical, "").into_owned();
    }

    canonical = REPEATED_BANG.replace_all(&canonical, ".").into_owned();
    canonical = REPEATED_DOT.replace_all(&canonical, ".").into_owned();
    canonical = strip_emoji(&canonical);
    canonical = WHITESPACE.replace_all(&canonical, " ").trim().to_string();

    if canonical.chars().count() > 500 {
        let truncated: String = canonical.chars().take(600).collect();
        let sentences: Vec<&str> = SENTENCE_SPLIT.split(&truncated).filter(|s| !s.trim().is_empty()).collect();
        canonical = if sentences.len() > 1 {
            format!("{}.", sentences[..sentences.len() - 1].join(". "))
        } else {
            format!("{}...", canonical.chars().take(500).collect::<String>())
        };
    }

    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_forwarding_prefix_and_url() {
        let input = "FWD: check this out https://example.com/x share this now!!!";
        let canonical = extract_canonical_claim(input);
        assert!(!canonical.to_lowercase().starts_with("fwd"));
        assert!(!canonical.contains("http"));
    }

    #[test]
    fn collapses_whitespace_and_repeated_punctuation() {
        let canonical = extract_canonical_claim("this   is    urgent!!!???");
        assert!(!canonical.contains("  "));
        assert!(!canonical.contains("!!!"));
    }

    #[test]
    fn truncates_long_text_on_sentence_boundary() {
        let long = "This is a claim sentence about something important. ".repeat(20);
        let canonical = extract_canonical_claim(&long);
        assert!(canonical.chars().count() <= 510);
    }
}
