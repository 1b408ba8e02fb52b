use cluster_manager::ClaimStatus;
use once_cell::sync::Lazy;

fn status_emoji(status: ClaimStatus) -> &'static str {
    match status {
        ClaimStatus::False => "❌",
        ClaimStatus::True => "✅",
        ClaimStatus::Misleading | ClaimStatus::PartiallyTrue => "⚠️",
        ClaimStatus::Unverifiable | ClaimStatus::Unknown => "❓",
    }
}

static AUTHORITATIVE_SOURCES: Lazy<Vec<(&str, &str)>> = Lazy::new(|| {
    vec![
        ("pib.gov.in", "PIB Fact Check"),
        ("who.int", "WHO"),
        ("cdc.gov", "CDC"),
        ("mohfw.gov.in", "Ministry of Health"),
        ("ndma.gov.in", "NDMA"),
        ("factcheck.org", "FactCheck.org"),
        ("snopes.com", "Snopes"),
        ("altnews.in", "Alt News"),
        ("boomlive.in", "BOOM"),
        ("vishvasnews.com", "Vishvas News"),
    ]
});

/// Extract authoritative source names mentioned in the evidence snippets,
/// sorted and deduplicated.
pub fn extract_sources(evidence_snippets: &[String]) -> Vec<String> {
    let mut sources = std::collections::BTreeSet::new();

    for snippet in evidence_snippets {
        let lower = snippet.to_lowercase();
        for (domain, name) in AUTHORITATIVE_SOURCES.iter() {
            if lower.contains(domain) || lower.contains(&name.to_lowercase()) {
                sources.insert(name.to_string());
            }
        }
        if lower.contains("who") && lower.contains("world health") {
            sources.insert("WHO".to_string());
        }
        if lower.contains("cdc") {
            sources.insert("CDC".to_string());
        }
        if lower.contains("pib") || lower.contains("press information bureau") {
            sources.insert("PIB Fact Check".to_string());
        }
        if lower.contains("government") && lower.contains("india") {
            sources.insert("Government of India".to_string());
        }
    }

    sources.into_iter().collect()
}

/// A WhatsApp-ready myth/fact rebuttal, generated deterministically with no
/// further model call.
pub fn generate_short_reply(status: ClaimStatus, claim_text: &str, explanation: &str, sources: &[String], _confidence: f32) -> String {
    let emoji = status_emoji(status);

    let (status_line, warning) = match status {
        ClaimStatus::False => (format!("{emoji} *FALSE - This is a HOAX!*"), "\n\n⚠️ *DO NOT FORWARD*"),
        ClaimStatus::True => (format!("{emoji} *TRUE - This is accurate*"), ""),
        ClaimStatus::Misleading | ClaimStatus::PartiallyTrue => {
            (format!("{emoji} *MISLEADING - Partly incorrect*"), "\n\n⚠️ *Verify before sharing*")
        }
        ClaimStatus::Unverifiable | ClaimStatus::Unknown => (format!("{emoji} *UNVERIFIED*"), "\n\n⚠️ *Check official sources*"),
    };

    let mut myth_fact = match status {
        ClaimStatus::False => format!("*Myth:* {claim_text}\n\n*Fact:* {explanation}"),
        ClaimStatus::True => format!("*Claim:* {claim_text}\n\n*Verification:* {explanation}"),
        _ => format!("*Claim:* {claim_text}\n\n*Status:* {explanation}"),
    };

    if status == ClaimStatus::False {
        let lower = claim_text.to_lowercase();
        if ["forward", "share", "urgent", "breaking"].iter().any(|w| lower.contains(w)) {
            myth_fact.push_str("\n\n*Why this is dangerous:* Spreading such messages creates panic and helps misinformation spread.");
        }
    }

    let source_line = if sources.is_empty() {
        String::new()
    } else {
        format!("\n\n✅ *Verified by:* {}", sources.iter().take(3).cloned().collect::<Vec<_>>().join(", "))
    };

    format!("{status_line}\n\n{myth_fact}{warning}{source_line}")
}

/// Multi-paragraph explanation with an evidence section and source list.
pub fn generate_long_reply(status: ClaimStatus, claim_text: &str, explanation: &str, evidence_snippets: &[String], sources: &[String]) -> String {
    let emoji = status_emoji(status);
    let header = match status {
        ClaimStatus::False => format!("{emoji} *FACT CHECK: FALSE*\n{}", "=".repeat(30)),
        ClaimStatus::True => format!("{emoji} *FACT CHECK: TRUE*\n{}", "=".repeat(30)),
        other => format!("{emoji} *FACT CHECK: {:?}*\n{}", other, "=".repeat(30)),
    };

    let claim_summary = summarize_claim(claim_text);
    let claim_section = format!("\n\n*Claim:*\n{claim_summary}");
    let verdict_section = format!("\n\n*Verdict:*\n{explanation}");

    let evidence_section = if evidence_snippets.is_empty() {
        String::new()
    } else {
        let evidence_text = evidence_snippets
            .iter()
            .take(3)
            .map(|snippet| {
                if snippet.chars().count() > 200 {
                    format!("• {}...", snippet.chars().take(200).collect::<String>())
                } else {
                    format!("• {snippet}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("\n\n*Evidence:*\n{evidence_text}")
    };

    let sources_section = if sources.is_empty() {
        String::new()
    } else {
        format!("\n\n*Official Sources:*\n{}", sources.join(", "))
    };

    let footer = if status == ClaimStatus::False {
        "\n\n⚠️ *This is misinformation. Do not share.*\n\n_Fact-checked by this service_".to_string()
    } else {
        "\n\n_Fact-checked by this service_".to_string()
    };

    format!("{header}{claim_section}{verdict_section}{evidence_section}{sources_section}{footer}")
}

fn summarize_claim(claim_text: &str) -> String {
    let sentences: Vec<&str> = claim_text.split(['.', '!', '?']).collect();
    sentences
        .into_iter()
        .take(2)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(". ")
}
