//! Search-facing error taxonomy (spec.md §4.5.6 "pre-flight validation"
//! and §4.5.3 "content query" rejections).

/// Errors a search request can fail with before or during execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search_path is empty")]
    PathIsEmpty,
    #[error("search_path does not exist or is not a directory")]
    PathNotFound,
    #[error("search_path is not readable")]
    PermissionDenied,
    #[error("boolean query has no sub-queries")]
    InvalidBoolean,
    #[error("filename keyword is empty and no file type/extension filter was given")]
    KeywordIsEmpty,
    #[error("one or more file_types are not in the supported tag set")]
    InvalidFileTypes,
    #[error("content search does not support the realtime method")]
    InvalidSearchMethod,
    #[error("content search does not support wildcard queries")]
    WildcardNotSupported,
    #[error("content search keyword is shorter than the minimum length")]
    KeywordTooShort,
    #[error("search timed out before completion")]
    SearchTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_non_empty() {
        assert!(!SearchError::PathIsEmpty.to_string().is_empty());
        assert!(!SearchError::SearchTimeout.to_string().is_empty());
    }
}
