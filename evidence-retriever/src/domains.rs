/// Extract the bare domain (no scheme, no `www.` prefix) from a URL. Falls
/// back to the original string on parse failure, matching the original's
/// defensive behavior.
pub fn extract_domain(raw_url: &str) -> String {
    match url::Url::parse(raw_url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or(raw_url);
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }
        Err(_) => raw_url.to_string(),
    }
}

pub fn is_authoritative_domain(raw_url: &str, allowlist: &[String]) -> bool {
    let domain = extract_domain(raw_url).to_lowercase();
    allowlist
        .iter()
        .any(|auth| domain == *auth || domain.ends_with(&format!(".{auth}")))
}
