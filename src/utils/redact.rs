use once_cell::sync::Lazy;
use regex::Regex;

const INLINE_REDACTION: &str = "***REDACTED***";

static QUERY_CREDENTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(api_key|apikey|access_token|token)=[^&\s#]+")
        .expect("query credential regex")
});

/// Masks credential-looking query parameters (`api_key=...`) in free text such as URLs.
pub fn redact_query_credentials(text: &str) -> String {
    QUERY_CREDENTIAL
        .replace_all(text, format!("$1={}", INLINE_REDACTION).as_str())
        .into_owned()
}

/// Masks every literal occurrence of the given secrets. Very short values are
/// skipped, they would shred unrelated text.
pub fn mask_secrets(text: &str, secrets: &[String]) -> String {
    let mut out = text.to_string();
    for secret in secrets {
        if secret.len() < 4 {
            continue;
        }
        if out.contains(secret.as_str()) {
            out = out.replace(secret.as_str(), INLINE_REDACTION);
        }
    }
    out
}

pub fn redact_text(text: &str, secrets: &[String]) -> String {
    redact_query_credentials(&mask_secrets(text, secrets))
}
