//! Log Redaction Layer
//!
//! Scrubs API keys, access tokens, and personal numeric codes (CNP) from
//! strings prior to logging.

use once_cell::sync::Lazy;
use regex::Regex;

static CNP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[1-9]\d{12}\b").unwrap());
static API_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap());
static KEY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?:api-key|ocp-apim-subscription-key)\s*[:=]\s*)[A-Za-z0-9\-_]+").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = input.to_string();

    // Redact personal numeric codes
    redacted = CNP_RE.replace_all(&redacted, "[REDACTED_CNP]").to_string();

    // Redact API keys and bearer tokens
    redacted = API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted = KEY_HEADER_RE.replace_all(&redacted, "${1}[REDACTED_TOKEN]").to_string();

    redacted
}

/// Mask a CNP for display, keeping the first digit and the last two.
pub fn mask_cnp(cnp: &str) -> String {
    let digits: Vec<char> = cnp.chars().collect();
    if digits.len() < 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 2..].iter().collect();
    format!("{}{}{}", digits[0], "*".repeat(digits.len() - 3), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Saving 1800101221144 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("1800101221144"));
        assert!(!clean.contains("Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(clean.contains("[REDACTED_CNP]"));
    }

    #[test]
    fn redacts_azure_key_headers() {
        let clean = redact_sensitive_data("headers: api-key: 0123abcd, Ocp-Apim-Subscription-Key=ffee99");
        assert_eq!(
            clean,
            "headers: api-key: [REDACTED_TOKEN], Ocp-Apim-Subscription-Key=[REDACTED_TOKEN]"
        );
    }

    #[test]
    fn leaves_short_numbers_alone() {
        assert_eq!(redact_sensitive_data("page 12 of 300"), "page 12 of 300");
    }

    #[test]
    fn masks_cnp() {
        assert_eq!(mask_cnp("1800101221144"), "1**********44");
        assert_eq!(mask_cnp("12"), "**");
    }
}
