//! # Text Processing Utilities
//!
//! Redaction of credentials in log lines and bounded previews of response
//! bodies. Everything in here is pure string work so it can be shared by the
//! API client and the MCP tool layer without pulling in HTTP types.

use once_cell::sync::Lazy;
use regex::Regex;

const REDACTION_TOKEN: &str = "[REDACTED]";

/// Redacts values that look like secrets in a string.
///
/// Covers `Authorization` headers, inline bearer/basic credentials, shell
/// style `*_SECRET=`/`*_TOKEN=` assignments and JSON entries such as
/// `"client_secret": "..."` or `"access_token": "..."`. Key names are kept so
/// the redacted line is still useful for debugging.
///
/// # Example
/// ```rust
/// use shopware_util::redact_sensitive;
///
/// let redacted = redact_sensitive("API_SECRET=abc123 STORE_URL=https://shop.test");
/// assert_eq!(redacted, "API_SECRET=[REDACTED] STORE_URL=https://shop.test");
///
/// let redacted = redact_sensitive("authorization: Bearer eyJ0eXAiOiJKV1Qi");
/// assert_eq!(redacted, "authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    redact_sensitive_with(input, REDACTION_TOKEN)
}

/// Redacts sensitive-looking values, using a custom replacement token.
pub fn redact_sensitive_with(input: &str, replacement: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.name("prefix").map(|m| m.as_str()).unwrap_or("");
                let suffix = captures.name("suffix").map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{replacement}{suffix}")
            })
            .to_string();
    }

    redacted
}

fn redact_patterns() -> &'static [Regex] {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);
    &REDACT_PATTERNS
}

// Order matters: the header pattern swallows the whole credential, so the
// bare bearer pattern only fires for tokens outside of a header line.
fn build_redact_patterns() -> Vec<Regex> {
    [
        r"(?i)(?P<prefix>authorization:\s+)(?P<value>[^\s,]+(?:\s+[^\s,]+)?)",
        r"(?i)(?P<prefix>\bBearer\s+)(?P<value>[A-Za-z0-9\-._~+/]+=*)",
        r"(?i)(?P<prefix>\b[A-Z0-9_]*(?:SECRET|TOKEN|PASSWORD|KEY)=)(?P<value>[^\s]+)",
        r#"(?i)(?P<prefix>"(?:client_secret|clientSecret|access_token|accessToken|refresh_token|password)"\s*:\s*")(?P<value>[^"]*)(?P<suffix>")"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("redaction pattern should compile"))
    .collect()
}

/// Collapse whitespace and cut `text` down to roughly `limit` bytes.
///
/// Used for log lines and error messages where a full response body would be
/// noise. Empty or whitespace-only input yields `<empty>`.
pub fn truncate_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_shell_style_secret_assignments() {
        let input = "export API_SECRET=supersecret";
        assert_eq!(redact_sensitive(input), "export API_SECRET=[REDACTED]");
    }

    #[test]
    fn redacts_json_style_oauth_fields() {
        let input = r#"{"grant_type": "client_credentials", "client_secret": "top-secret"}"#;
        let expected = r#"{"grant_type": "client_credentials", "client_secret": "[REDACTED]"}"#;
        assert_eq!(redact_sensitive(input), expected);
    }

    #[test]
    fn redacts_access_token_in_token_response() {
        let input = r#"{"token_type":"Bearer","expires_in":600,"access_token":"eyJhbGciOi"}"#;
        let redacted = redact_sensitive(input);
        assert!(redacted.contains(r#""access_token":"[REDACTED]""#));
        assert!(redacted.contains(r#""expires_in":600"#));
    }

    #[test]
    fn ignores_non_sensitive_assignments() {
        let input = "STORE_URL=https://shop.example.com PORT=8080";
        assert_eq!(redact_sensitive(input), input);
    }

    #[test]
    fn truncate_preview_collapses_whitespace() {
        assert_eq!(truncate_preview("a\n\n\tb", 50), "a b");
        assert_eq!(truncate_preview("   ", 50), "<empty>");
    }

    #[test]
    fn truncate_preview_cuts_long_bodies() {
        let body = "x".repeat(500);
        let preview = truncate_preview(&body, 10);
        assert_eq!(preview, format!("{}...", "x".repeat(10)));
    }
}
