//! Name canonicalization.

/// Canonicalize a free-text name for comparison.
///
/// Trims, lower-cases and collapses every run of whitespace to a single
/// space.
///
/// # Examples
///
/// ```
/// use haul_board::names::normalize;
///
/// assert_eq!(normalize("  ACME   Transport\t"), "acme transport");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// [`normalize`] for an absent value: `None` becomes the empty string.
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_space_insensitive() {
        assert_eq!(normalize("  ACME Transport  "), normalize("acme transport"));
    }

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(normalize("a \t\n b\u{00A0}c"), "a b c");
    }

    #[test]
    fn blank_and_absent() {
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" X ")), "x");
    }
}
