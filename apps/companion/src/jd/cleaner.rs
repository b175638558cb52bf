//! Job-description normalisation before skill extraction.

use std::sync::OnceLock;

use regex::Regex;

/// Characters stripped from job descriptions. `/`, `-` and `#` are kept.
pub const STRIPPED_PUNCTUATION: &str = "!\"$%&'()*.,:;<=>?@[\\]^_`{|}~";

struct Patterns {
    digits: Regex,
    plus: Regex,
    non_ascii: Regex,
    punctuation: Regex,
    hashtags: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        digits: Regex::new(r"\d+").expect("valid regex"),
        plus: Regex::new(r"\+").expect("valid regex"),
        non_ascii: Regex::new(r"[^\x00-\x7F]+").expect("valid regex"),
        punctuation: Regex::new(&format!("[{}]", regex::escape(STRIPPED_PUNCTUATION)))
            .expect("valid regex"),
        hashtags: Regex::new(r"#\w+").expect("valid regex"),
        whitespace: Regex::new(r"\s+").expect("valid regex"),
    })
}

/// Lowercases the text and strips digits, `+`, non-ASCII characters,
/// punctuation and `#tag` tokens, then collapses whitespace.
///
/// Tags are removed after punctuation so that input like `#!rust` cannot
/// turn into a fresh tag; this keeps the function idempotent.
pub fn clean_job_description(raw: &str) -> String {
    let p = patterns();
    let text = raw.to_lowercase();
    let text = p.digits.replace_all(&text, "");
    let text = p.plus.replace_all(&text, "");
    let text = p.non_ascii.replace_all(&text, "");
    let text = p.punctuation.replace_all(&text, "");
    let text = p.hashtags.replace_all(&text, "");
    let text = p.whitespace.replace_all(&text, " ");
    text.trim().to_string()
}
