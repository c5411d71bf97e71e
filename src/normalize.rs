//! Canonicalization rules for club codes, club names, and tag names.
//!
//! These are pure transforms applied before anything touches the store,
//! so the database only ever sees canonical values.

/// Canonical club code: trimmed and lowercased.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_lowercase();
    if code.is_empty() { None } else { Some(code) }
}

/// Club/display name: trimmed, must be non-empty.
pub fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Canonical tag name: trimmed and title-cased. Returns `None` for
/// blank input; callers drop blanks from tag lists rather than
/// erroring.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(title_case(trimmed))
}

/// Normalizes a raw tag list: blank entries are dropped, the rest are
/// canonicalized, and duplicates (post-normalization) collapse to one.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in raw {
        if let Some(canonical) = normalize_tag(tag.as_ref())
            && !out.contains(&canonical)
        {
            out.push(canonical);
        }
    }
    out
}

/// Uppercases the first letter of every letter run and lowercases the
/// rest, so any non-letter (space, hyphen, digit) starts a new word.
/// Non-letter characters pass through untouched.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_trimmed_and_lowercased() {
        assert_eq!(normalize_code("  PennLabs "), Some("pennlabs".to_string()));
        assert_eq!(normalize_code("abc"), Some("abc".to_string()));
    }

    #[test]
    fn blank_code_and_name_are_rejected() {
        assert_eq!(normalize_code("   "), None);
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_name("  \t "), None);
    }

    #[test]
    fn name_keeps_inner_case() {
        assert_eq!(
            normalize_name("  Penn Labs  "),
            Some("Penn Labs".to_string())
        );
    }

    #[test]
    fn tag_is_title_cased_per_word() {
        assert_eq!(normalize_tag(" music "), Some("Music".to_string()));
        assert_eq!(
            normalize_tag("pre professional"),
            Some("Pre Professional".to_string())
        );
        assert_eq!(normalize_tag("MUSIC"), Some("Music".to_string()));
    }

    #[test]
    fn tag_title_casing_restarts_at_non_letter_boundaries() {
        assert_eq!(
            normalize_tag("pre-professional"),
            Some("Pre-Professional".to_string())
        );
        assert_eq!(normalize_tag("d&d club"), Some("D&D Club".to_string()));
        // Internal spacing is preserved, not collapsed.
        assert_eq!(normalize_tag("fine  arts"), Some("Fine  Arts".to_string()));
    }

    #[test]
    fn blank_tags_are_dropped_not_errors() {
        assert_eq!(normalize_tag("   "), None);
        let tags = normalize_tags(["music", "  ", "", " Music ", "arts"]);
        assert_eq!(tags, vec!["Music".to_string(), "Arts".to_string()]);
    }
}
