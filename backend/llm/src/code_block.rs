//! Markdown code-fence removal for model replies.
//!
//! Chat models tend to wrap JSON (and sometimes plain text) in fenced blocks
//! even when told not to.

use once_cell::sync::Lazy;
use regex::Regex;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json\s*\n([\s\S]*?)\n```").unwrap());

static ANY_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*\n([\s\S]*?)\n```").unwrap());

/// Return the body of the first ```` ```json ```` block, else of the first bare
/// ```` ``` ```` block, else the whole text. The result is always trimmed.
pub fn strip_code_fences(text: &str) -> String {
    for fence in [&*JSON_FENCE, &*ANY_FENCE] {
        if let Some(body) = fence.captures(text).and_then(|c| c.get(1)) {
            return body.as_str().trim().to_string();
        }
    }
    text.trim().to_string()
}
