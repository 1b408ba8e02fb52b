use serde::{Deserialize, Serialize};

/// Result of running the claim detector over a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub is_claim: bool,
    pub canonical_text: String,
    pub language: String,
    pub topics: Vec<String>,
}

impl Classification {
    pub fn non_claim(original: &str) -> Self {
        Self {
            is_claim: false,
            canonical_text: original.to_string(),
            language: "en".to_string(),
            topics: Vec::new(),
        }
    }
}
