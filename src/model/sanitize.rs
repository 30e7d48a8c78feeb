//! # Export Sanitization
//!
//! Free-text fields are stripped to printable ASCII (0x20-0x7E) before
//! emission so the exported records embed in strict JSON without further
//! escaping on the client side.

/// Strip characters outside the printable ASCII range.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| (' '..='~').contains(c)).collect()
}

/// Sanitize an optional field, preserving null.
pub(crate) fn sanitize_opt(input: Option<String>) -> Option<String> {
    input.map(|s| sanitize(&s))
}

/// Sanitize a nullable field that exports as empty string when null.
pub(crate) fn sanitize_or_empty(input: Option<String>) -> String {
    input.map(|s| sanitize(&s)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii_passes_through() {
        let s = "Phalaenopsis 'Mini Mark' #3 ~ (x2)";
        assert_eq!(sanitize(s), s);
    }

    #[test]
    fn test_strips_outside_printable_range() {
        assert_eq!(sanitize("a\u{0e44}b\u{0e17}c"), "abc");
        assert_eq!(sanitize("tab\there\nnewline"), "tabherenewline");
        assert_eq!(sanitize("\u{7f}\u{1b}"), "");
    }

    #[test]
    fn test_boundaries_inclusive() {
        assert_eq!(sanitize(" ~"), " ~");
        assert_eq!(sanitize("\u{1f}\u{7f}"), "");
    }

    #[test]
    fn test_null_defaulting() {
        assert_eq!(sanitize_or_empty(None), "");
        assert_eq!(sanitize_opt(None), None);
        assert_eq!(sanitize_opt(Some("ok".to_string())), Some("ok".to_string()));
    }
}
