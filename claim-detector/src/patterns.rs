//! Rule-based pattern corpora for claim detection. Ported from the
//! original service's `CLAIM_PATTERNS` / `HIGH_PRIORITY_PATTERNS` /
//! `NON_CLAIM_PATTERNS` tables.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static CLAIM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(is|are|was|were|will be|has been|have been)\s+(proven|confirmed|discovered|revealed|shown)\b",
        r"\b(causes?|prevents?|cures?|kills?|protects?)\s+\w+",
        r"\b(always|never|100%|guaranteed|definitely|certainly)\b",
        r"\b(urgent|breaking|alert|warning|danger|shocking|incredible)\b",
        r"\b(share this|forward|must read|everyone should know)\b",
        r"\b(cyclone|hurricane|typhoon|storm|earthquake|tsunami|floods?|landslides?)\b",
        r"\b(red|orange|yellow)\s+alerts?\b",
        r"\balerts?\s+issued|warnings?\s+issued\b",
        r"\b(evacuate|evacuation|take shelter|seek shelter|emergency)\b",
        r"\b(death toll|casualties|injured|missing persons?)\b",
        r"\b(magnitude|intensity|category|level)\s+\d+\b",
        r"\bearth\s+is\s+flat\b",
        r"\bscam\b",
        r"\bhoax\b",
        r"\bconspiracy\b",
        r"\b(vaccine|vaccination|covid|corona|virus|treatment|cure|medicine|drug)\b",
        r"\b(cancer|disease|illness|symptoms|side effects)\b",
        r"\b(government|they|officials|elites?|billionaires?)\s+(is|are|wants?|hides?|hiding|cover)",
        r"\b(secret|hidden|suppressed|censored|banned)\b",
        r"\b(don't want you to know|wake up|truth|exposed|leaked)\b",
        r"\b\d+\s*(%|percent|times|x)\s*(more|less|higher|lower|better|worse)\b",
        r"\b(study|research|survey|poll)\s+(shows?|finds?|reveals?|proves?)\b",
        r"\b(scientists?|doctors?|experts?|researchers?|professors?)\s+(say|claim|confirm|discover)\b",
        r"\b(according to|based on|sources? say|reports? indicate)\b",
    ])
});

static HIGH_PRIORITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(is dead|has died|was found dead|has been found dead|passed away|died in|died at|was killed in|killed in)\b",
        r"\b(declared dead|pronounced dead)\b",
    ])
});

static NON_CLAIM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"^\s*(what|who|where|when|why|how|is|are|do|does|did|can|could|would|should)\s+.+\?\s*$",
        r"\b(i think|i believe|in my opinion|personally|i feel|seems to me)\b",
        r"\b(maybe|perhaps|might|could be|possibly|i wonder)\b",
        r"^\s*(hi|hello|hey|good morning|good evening|thanks|thank you)\b",
        r"^\s*(lol|haha|hehe)\b",
    ])
});

static AUXILIARY_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(is|are|was|were|has|have|had|will|shall|won|lost)\b").unwrap());
static PROPER_NOUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z]+$").unwrap());
static HAS_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{2,4}\b").unwrap());

fn compile(raw: &[&str]) -> Vec<Regex> {
    raw.iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("static claim-detector pattern is valid regex"))
        .collect()
}

fn matches_any(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

pub fn is_high_priority_claim(text: &str) -> bool {
    matches_any(&HIGH_PRIORITY_PATTERNS, &text.to_lowercase())
}

/// Rule score: 0.0 on quick rejection (too short/long or a non-claim
/// pattern), else `min(matches / 3.0, 1.0)` over the claim pattern set.
pub fn rule_based_claim_score(text: &str, min_len: usize, max_len: usize) -> f32 {
    let lower = text.to_lowercase();
    let char_len = lower.chars().count();

    if char_len < min_len || char_len > max_len {
        return 0.0;
    }
    if matches_any(&NON_CLAIM_PATTERNS, &lower) {
        return 0.0;
    }

    let matches = CLAIM_PATTERNS.iter().filter(|p| p.is_match(&lower)).count();
    (matches as f32 / 3.0).min(1.0)
}

/// Fallback heuristic for declarative factual sentences that miss every
/// narrow pattern (e.g. "India has won a bid to host Commonwealth Games
/// 2030").
pub fn looks_like_generic_fact(text: &str) -> bool {
    let trimmed = text.trim();

    if trimmed.ends_with('?') {
        return false;
    }
    if matches_any(&NON_CLAIM_PATTERNS, &trimmed.to_lowercase()) {
        return false;
    }
    if !AUXILIARY_VERB.is_match(trimmed) {
        return false;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() < 5 {
        return false;
    }

    let has_number = HAS_NUMBER.is_match(trimmed);
    let has_proper_noun = tokens
        .iter()
        .any(|tok| PROPER_NOUN.is_match(tok.graphemes(true).collect::<String>().as_str()));

    has_proper_noun || has_number
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_claim_pattern_forces_zero_score() {
        let score = rule_based_claim_score("i think maybe it will rain tomorrow", 10, 5000);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn high_priority_pattern_detected() {
        assert!(is_high_priority_claim("the actor was found dead this morning"));
        assert!(!is_high_priority_claim("the actor had a great morning"));
    }

    #[test]
    fn rule_score_caps_at_one() {
        let text = "urgent breaking vaccine causes cancer hoax conspiracy secret exposed leaked";
        let score = rule_based_claim_score(text, 10, 5000);
        assert_eq!(score, 1.0);
    }
}
