//! Query normalizer: strips markdown artifacts from raw synthesizer output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FENCE_MARKERS: Regex = Regex::new(r"(?i)```sql\s*|\s*```").unwrap();
}

/// Strip code-fence markers and surrounding whitespace from raw model
/// output. No SQL validation happens here; a malformed statement is only
/// discovered at execution time.
pub fn normalize(raw: &str) -> String {
    FENCE_MARKERS.replace_all(raw, "").trim().to_string()
}
