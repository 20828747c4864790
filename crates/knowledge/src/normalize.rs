//! Whitespace normalization of extracted text.

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_mixed_whitespace() {
        let raw = "  Abstract.\n\nThis\tpaper   studies\r\nX.  ";
        assert_eq!(normalize(raw), "Abstract. This paper studies X.");
    }

    #[test]
    fn test_unicode_whitespace() {
        assert_eq!(normalize("a\u{00A0}\u{2003}b\u{3000}c"), "a b c");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("one\n two\t\tthree ");
        assert_eq!(normalize(&once), once);
    }
}
