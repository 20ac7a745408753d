//! Content search rules (spec.md §4.5.3, §9 supplemented feature 5):
//! which files are eligible for content indexing, and how a multi-term
//! content query combines with a filename filter.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::config::MIN_CONTENT_SEARCH_KEYWORD_LENGTH;

/// Extensions the content indexer will actually extract text from
/// (spec.md §9 supplemented feature 5, grounded in `supportedExtensions`).
static SUPPORTED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "rtf", "odt", "ods", "odp", "odg", "docx", "xlsx", "pptx", "ppsx", "md", "xls", "xlsb", "doc", "dot", "wps",
        "ppt", "pps", "txt", "pdf", "dps", "sh", "html", "htm", "xml", "xhtml", "dhtml", "shtm", "shtml", "json",
        "css", "yaml", "ini", "bat", "js", "sql", "uof", "ofd",
    ]
    .into_iter()
    .collect()
});

pub fn is_supported_content_search_extension(suffix: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(suffix.to_lowercase().as_str())
}

pub fn default_content_search_extensions() -> Vec<&'static str> {
    SUPPORTED_EXTENSIONS.iter().copied().collect()
}

/// A keyword too short to be worth running against the content index
/// (spec.md §4.5.3): content queries need at least
/// [`MIN_CONTENT_SEARCH_KEYWORD_LENGTH`] UTF-8 bytes to keep the match
/// count sane. Byte length, not scalar count — `contentsearchengine.cpp`
/// checks `keyword().toUtf8().size()`, so a single CJK character (3
/// bytes) already clears a threshold of 2.
pub fn is_content_keyword_long_enough(keyword: &str) -> bool {
    keyword.len() >= MIN_CONTENT_SEARCH_KEYWORD_LENGTH
}

/// A result matches a mixed filename+content query only when it
/// satisfies both halves (spec.md §4.5.3 "mixed-AND semantics") — a file
/// named after the keyword but containing unrelated text is not a
/// content match, and vice versa.
pub fn matches_mixed_query(filename_hit: bool, content_hit: bool, content_search_requested: bool) -> bool {
    if content_search_requested {
        filename_hit && content_hit
    } else {
        filename_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_case_insensitive_extensions() {
        assert!(is_supported_content_search_extension("PDF"));
        assert!(is_supported_content_search_extension("md"));
        assert!(!is_supported_content_search_extension("exe"));
    }

    #[test]
    fn short_keywords_are_rejected() {
        assert!(!is_content_keyword_long_enough("a"));
        assert!(is_content_keyword_long_enough("ab"));
    }

    #[test]
    fn length_is_utf8_bytes_not_chars() {
        // "中" is one char but three UTF-8 bytes, so it already clears
        // the threshold even though it's a single scalar value.
        assert!(is_content_keyword_long_enough("中"));
    }

    #[test]
    fn mixed_query_requires_both_hits() {
        assert!(!matches_mixed_query(true, false, true));
        assert!(matches_mixed_query(true, false, false));
        assert!(matches_mixed_query(true, true, true));
    }
}
