//! Search-mode planning (spec.md §4.5.1): picks which query strategy a
//! request should run through, grounded in the original's
//! `determineSearchType`.

use crate::search::pinyin::{is_pinyin_acronym_sequence, is_pinyin_sequence};
use crate::search::query::{QueryType, SearchOptions, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Simple,
    Wildcard,
    Boolean,
    Pinyin,
    PinyinAcronym,
    FileType,
    FileExt,
    Combined,
}

/// Chooses the search mode for `query`/`options`. Order matters: a
/// keyword combined with file-type/extension filters always wins as
/// `Combined` before any of the single-dimension modes are considered
/// (spec.md §4.5.1).
pub fn plan(query: &SearchQuery, options: &SearchOptions) -> SearchMode {
    let has_keyword = query.has_keyword();
    let has_file_types = !options.file_types.is_empty();
    let has_file_exts = !options.file_extensions.is_empty();
    let is_boolean = query.query_type == QueryType::Boolean;

    if (has_keyword || is_boolean) && (has_file_types || has_file_exts) {
        return SearchMode::Combined;
    }

    if !has_keyword && has_file_types {
        return SearchMode::FileType;
    }
    if !has_keyword && has_file_exts {
        return SearchMode::FileExt;
    }

    if query.query_type == QueryType::Wildcard {
        return SearchMode::Wildcard;
    }
    if is_boolean {
        return SearchMode::Boolean;
    }

    if options.pinyin_enabled || options.pinyin_acronym_enabled {
        if options.pinyin_enabled && options.pinyin_acronym_enabled {
            if has_keyword && is_pinyin_sequence(&query.keyword) {
                return SearchMode::Pinyin;
            }
            if has_keyword && is_pinyin_acronym_sequence(&query.keyword) {
                return SearchMode::PinyinAcronym;
            }
            return SearchMode::Simple;
        }
        if options.pinyin_enabled {
            return SearchMode::Pinyin;
        }
        if options.pinyin_acronym_enabled {
            return SearchMode::PinyinAcronym;
        }
    }

    SearchMode::Simple
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::FileTypeTag;

    #[test]
    fn keyword_with_file_type_is_combined() {
        let query = SearchQuery::simple("report");
        let mut options = SearchOptions::default();
        options.file_types = vec![FileTypeTag::Doc];
        assert_eq!(plan(&query, &options), SearchMode::Combined);
    }

    #[test]
    fn empty_keyword_with_extension_is_file_ext() {
        let query = SearchQuery::simple("");
        let mut options = SearchOptions::default();
        options.file_extensions = vec!["pdf".into()];
        assert_eq!(plan(&query, &options), SearchMode::FileExt);
    }

    #[test]
    fn pinyin_sequence_prefers_pinyin_over_acronym() {
        let query = SearchQuery::simple("nihao");
        let options = SearchOptions { pinyin_enabled: true, pinyin_acronym_enabled: true, ..Default::default() };
        assert_eq!(plan(&query, &options), SearchMode::Pinyin);
    }

    #[test]
    fn acronym_fallback_when_not_a_pinyin_sequence() {
        let query = SearchQuery::simple("nh");
        let options = SearchOptions { pinyin_enabled: true, pinyin_acronym_enabled: true, ..Default::default() };
        assert_eq!(plan(&query, &options), SearchMode::PinyinAcronym);
    }

    #[test]
    fn neither_pinyin_form_falls_back_to_simple() {
        let query = SearchQuery::simple("xyz123");
        let options = SearchOptions { pinyin_enabled: true, pinyin_acronym_enabled: true, ..Default::default() };
        assert_eq!(plan(&query, &options), SearchMode::Simple);
    }

    #[test]
    fn boolean_query_wins_over_pinyin() {
        let query = SearchQuery::boolean(vec![], crate::search::query::BooleanOperator::And);
        let options = SearchOptions { pinyin_enabled: true, ..Default::default() };
        assert_eq!(plan(&query, &options), SearchMode::Boolean);
    }
}
