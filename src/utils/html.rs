//! HTML utility functions.
//!
//! - `inject_before_body_end()` - splice a snippet before the last `</body>`

/// Insert `snippet` before the last `</body>` (ASCII case-insensitive),
/// or append it when the document has no closing body tag.
pub fn inject_before_body_end(html: &str, snippet: &str) -> String {
    let mut out = String::with_capacity(html.len() + snippet.len());
    match rfind_ignore_ascii_case(html, "</body>") {
        Some(pos) => {
            out.push_str(&html[..pos]);
            out.push_str(snippet);
            out.push_str(&html[pos..]);
        }
        None => {
            out.push_str(html);
            out.push_str(snippet);
        }
    }
    out
}

fn rfind_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .rev()
        .find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
