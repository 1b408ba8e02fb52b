use std::collections::HashSet;

/// How much the evidence snippets overlap with the claim's content words.
/// Used only to tell the model how reliable the evidence set is, so it can
/// prefer UNKNOWN/UNVERIFIABLE over FALSE when coverage is weak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    None,
    Low,
    Medium,
    High,
}

impl Coverage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coverage::None => "NONE",
            Coverage::Low => "LOW",
            Coverage::Medium => "MEDIUM",
            Coverage::High => "HIGH",
        }
    }
}

pub fn assess_evidence_coverage(claim_text: &str, evidence_snippets: &[String]) -> Coverage {
    if evidence_snippets.is_empty() {
        return Coverage::None;
    }

    let claim_tokens: Vec<String> = claim_text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.len() > 3)
        .map(|t| t.to_string())
        .collect();

    if claim_tokens.is_empty() {
        return Coverage::Low;
    }

    let joined_evidence = evidence_snippets.join(" ").to_lowercase();
    let unique_tokens: HashSet<&String> = claim_tokens.iter().collect();
    let hits = unique_tokens.iter().filter(|t| joined_evidence.contains(t.as_str())).count();
    let ratio = hits as f32 / unique_tokens.len() as f32;

    if ratio == 0.0 {
        Coverage::None
    } else if ratio < 0.2 {
        Coverage::Low
    } else if ratio < 0.5 {
        Coverage::Medium
    } else {
        Coverage::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_evidence_is_none() {
        assert_eq!(assess_evidence_coverage("some claim text", &[]), Coverage::None);
    }

    #[test]
    fn unrelated_evidence_is_none() {
        let snippets = vec!["completely unrelated discussion about gardening".to_string()];
        assert_eq!(assess_evidence_coverage("scientists discovered cure", &snippets), Coverage::None);
    }

    #[test]
    fn fully_overlapping_evidence_is_high() {
        let snippets = vec!["scientists discovered a new treatment for disease".to_string()];
        assert_eq!(assess_evidence_coverage("scientists discovered treatment disease", &snippets), Coverage::High);
    }
}
