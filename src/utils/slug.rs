//! URL slugs for tag pages.

use deunicode::deunicode;

/// Slugify a tag name: transliterate to ASCII, lowercase, and collapse
/// runs of non-alphanumerics into a single `-`.
///
/// Returns `"-"` for input with no alphanumerics so the page still has a path.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push('-');
    }
    slug
}
