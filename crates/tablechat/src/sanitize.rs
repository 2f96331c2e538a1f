//! Input sanitizer: denylist removal on raw user text.
//!
//! Strips whole-word statement keywords and SQL metacharacters by deletion,
//! not escaping. The output is prompt input for the synthesizer, never SQL.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STATEMENT_KEYWORDS: Regex =
        Regex::new(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|ALTER|CREATE)\b").unwrap();
    static ref COMMENT_MARKER: Regex = Regex::new(r"--").unwrap();
    static ref METACHARACTERS: Regex = Regex::new(r"[;*]").unwrap();
}

/// Remove statement keywords, `--`, `;` and `*` from user text,
/// case-insensitively. Deterministic and total.
pub fn sanitize(input: &str) -> String {
    let without_keywords = STATEMENT_KEYWORDS.replace_all(input, "");
    let without_comments = COMMENT_MARKER.replace_all(&without_keywords, "");
    METACHARACTERS.replace_all(&without_comments, "").into_owned()
}
