// Author: Dustin Pilgrim
// License: MIT

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
});

/// Whether `name` can be written as a plain identifier (`user`, `$el`, `_x1`).
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Render a property name the way it would appear after a dot, falling back
/// to bracket form for names that are not plain identifiers.
pub fn format_member(name: &str, optional: bool) -> String {
    match (is_identifier(name), optional) {
        (true, true) => format!("?.{}", name),
        (true, false) => format!(".{}", name),
        (false, true) => format!("?.[{:?}]", name),
        (false, false) => format!("[{:?}]", name),
    }
}

/// Parse a canonical array index ("0", "12"); rejects "01", "-1", "1.0".
pub fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("user"));
        assert!(is_identifier("$el"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("first-name"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_format_member() {
        assert_eq!(format_member("address", true), "?.address");
        assert_eq!(format_member("street", false), ".street");
        assert_eq!(format_member("first name", false), "[\"first name\"]");
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("12"), Some(12));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("name"), None);
    }
}
