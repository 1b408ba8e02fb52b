use cluster_manager::ClaimStatus;
use once_cell::sync::Lazy;
use regex::Regex;

static STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)STATUS:\s*(\w+)").unwrap());
static CONFIDENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)CONFIDENCE:\s*([\d.]+)").unwrap());
static SHORT_REPLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)SHORT_REPLY:\s*(.+?)(?=\n[A-Z_]+:|$)").unwrap());
static LONG_REPLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)LONG_REPLY:\s*(.+?)(?=\n[A-Z_]+:|$)").unwrap());

pub struct ParsedFields {
    pub status: ClaimStatus,
    pub confidence: f32,
    pub short_reply: String,
    pub long_reply: String,
}

impl Default for ParsedFields {
    fn default() -> Self {
        Self {
            status: ClaimStatus::Unknown,
            confidence: 0.3,
            short_reply: "We could not verify this claim. Please check official sources.".to_string(),
            long_reply: "This claim requires further verification.".to_string(),
        }
    }
}

fn parse_status(raw: &str) -> ClaimStatus {
    match raw.to_uppercase().as_str() {
        "TRUE" => ClaimStatus::True,
        "FALSE" => ClaimStatus::False,
        "MISLEADING" => ClaimStatus::Misleading,
        "PARTIALLY_TRUE" => ClaimStatus::PartiallyTrue,
        "UNVERIFIABLE" => ClaimStatus::Unverifiable,
        _ => ClaimStatus::Unknown,
    }
}

/// Regex-extract the STATUS/CONFIDENCE/SHORT_REPLY/LONG_REPLY fields from
/// an adjudicator response. An empty or field-less response falls back to
/// the default unparseable fields.
pub fn parse_response(response: &str) -> ParsedFields {
    if response.trim().is_empty() {
        return ParsedFields::default();
    }

    let mut fields = ParsedFields::default();

    if let Some(captures) = STATUS_RE.captures(response) {
        fields.status = parse_status(&captures[1]);
    }

    if let Some(captures) = CONFIDENCE_RE.captures(response) {
        if let Ok(parsed) = captures[1].parse::<f32>() {
            fields.confidence = parsed.clamp(0.0, 1.0);
        }
    }

    if let Some(captures) = SHORT_REPLY_RE.captures(response) {
        let mut short_reply = captures[1].trim().to_string();
        if short_reply.chars().count() > 200 {
            short_reply = format!("{}...", short_reply.chars().take(197).collect::<String>());
        }
        fields.short_reply = short_reply;
    }

    if let Some(captures) = LONG_REPLY_RE.captures(response) {
        fields.long_reply = captures[1].trim().to_string();
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields_from_well_formed_response() {
        let response = "STATUS: FALSE\nCONFIDENCE: 0.9\nSHORT_REPLY: This is false.\nLONG_REPLY: Detailed explanation here.\nSOURCES: WHO";
        let fields = parse_response(response);
        assert_eq!(fields.status, ClaimStatus::False);
        assert_eq!(fields.confidence, 0.9);
        assert_eq!(fields.short_reply, "This is false.");
        assert_eq!(fields.long_reply, "Detailed explanation here.");
    }

    #[test]
    fn empty_response_falls_back_to_default_unknown() {
        let fields = parse_response("");
        assert_eq!(fields.status, ClaimStatus::Unknown);
        assert_eq!(fields.confidence, 0.3);
    }

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let fields = parse_response("STATUS: TRUE\nCONFIDENCE: 1.5\nSHORT_REPLY: ok\nLONG_REPLY: ok");
        assert_eq!(fields.confidence, 1.0);
    }

    #[test]
    fn short_reply_truncated_past_200_chars() {
        let long_text = "a".repeat(250);
        let response = format!("STATUS: TRUE\nCONFIDENCE: 0.8\nSHORT_REPLY: {long_text}\nLONG_REPLY: ok");
        let fields = parse_response(&response);
        assert!(fields.short_reply.ends_with("..."));
        assert_eq!(fields.short_reply.chars().count(), 200);
    }
}
