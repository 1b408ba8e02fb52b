//! Fixed keyword table for coarse topic extraction.

use once_cell::sync::Lazy;

static TOPIC_KEYWORDS: Lazy<Vec<(&'static str, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        ("health", vec!["vaccine", "covid", "corona", "virus", "medicine", "cure", "treatment", "disease", "health", "hospital", "doctor"]),
        ("politics", vec!["government", "election", "politician", "minister", "party", "vote", "parliament", "law", "policy"]),
        ("science", vec!["research", "study", "scientist", "discovery", "experiment", "technology", "climate", "environment"]),
        ("finance", vec!["money", "bank", "economy", "tax", "investment", "stock", "bitcoin", "crypto", "loan"]),
        ("social", vec!["religion", "caste", "community", "riot", "protest", "violence", "discrimination"]),
        ("disaster", vec!["earthquake", "flood", "cyclone", "tsunami", "fire", "accident", "emergency"]),
        ("food", vec!["food", "water", "nutrition", "diet", "eating", "drinking", "organic"]),
        ("technology", vec!["phone", "internet", "5g", "radiation", "hacking", "privacy", "data", "whatsapp", "app"]),
        ("misinformation", vec!["hoax", "fake", "forward", "share", "urgent", "breaking", "secret", "exposed", "truth"]),
    ]
});

pub fn get_claim_topics(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let topics: Vec<String> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(topic, _)| topic.to_string())
        .collect();

    if topics.is_empty() {
        vec!["general".to_string()]
    } else {
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_health_topic() {
        let topics = get_claim_topics("this vaccine causes serious side effects in covid patients");
        assert!(topics.contains(&"health".to_string()));
    }

    #[test]
    fn falls_back_to_general() {
        let topics = get_claim_topics("the sky looks nice today");
        assert_eq!(topics, vec!["general".to_string()]);
    }

    #[test]
    fn detects_multiple_topics() {
        let topics = get_claim_topics("government hides vaccine side effects, share this urgent truth");
        assert!(topics.contains(&"health".to_string()));
        assert!(topics.contains(&"politics".to_string()));
        assert!(topics.contains(&"misinformation".to_string()));
    }
}
