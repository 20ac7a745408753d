//! Index query construction (spec.md §4.5.2), grounded in the original's
//! `buildIndexQuery`.

use crate::search::planner::SearchMode;
use crate::search::query::{BooleanOperator, FileTypeTag, QueryType, SearchOptions, SearchQuery};

/// The fully-resolved query the index strategy actually executes
/// (spec.md §4.5.2 "IndexQuery").
#[derive(Debug, Clone, Default)]
pub struct IndexQuery {
    pub mode: Option<SearchMode>,
    pub case_sensitive: bool,
    pub terms: Vec<String>,
    pub boolean_op: BooleanOperator,
    pub file_types: Vec<FileTypeTag>,
    pub file_extensions: Vec<String>,
    pub use_pinyin: bool,
    pub use_pinyin_acronym: bool,
    pub combine_with_file_type: bool,
    pub combine_with_file_ext: bool,
}

/// Extracts every leaf keyword from a boolean query, falling back to the
/// top-level keyword when there are no sub-queries (spec.md §4.5.2,
/// grounded in `extractBooleanKeywords`). Empty keywords are dropped.
pub fn extract_boolean_keywords(query: &SearchQuery) -> Vec<String> {
    let mut keywords: Vec<String> = if query.query_type == QueryType::Boolean {
        query.sub_queries.iter().map(|s| s.keyword.clone()).collect()
    } else {
        vec![query.keyword.clone()]
    };
    if query.query_type == QueryType::Boolean && keywords.is_empty() {
        keywords.push(query.keyword.clone());
    }
    keywords.retain(|k| !k.is_empty());
    keywords
}

pub fn build_index_query(query: &SearchQuery, mode: SearchMode, options: &SearchOptions) -> IndexQuery {
    let mut result = IndexQuery {
        mode: Some(mode),
        case_sensitive: options.case_sensitive,
        file_types: options.file_types.clone(),
        file_extensions: options.file_extensions.clone(),
        use_pinyin: options.pinyin_enabled,
        use_pinyin_acronym: options.pinyin_acronym_enabled,
        ..Default::default()
    };

    match mode {
        SearchMode::Simple | SearchMode::Wildcard | SearchMode::Pinyin | SearchMode::PinyinAcronym => {
            result.terms.push(query.keyword.clone());
        }
        SearchMode::Boolean => {
            result.terms = extract_boolean_keywords(query);
            result.boolean_op = query.boolean_operator;
        }
        SearchMode::FileType => {
            result.file_types = options.file_types.clone();
        }
        SearchMode::FileExt => {
            result.file_extensions = options.file_extensions.clone();
        }
        SearchMode::Combined => {
            result.terms = if query.query_type == QueryType::Boolean {
                extract_boolean_keywords(query)
            } else {
                vec![query.keyword.clone()]
            };
            result.boolean_op = query.boolean_operator;
            result.combine_with_file_type = !options.file_types.is_empty();
            result.combine_with_file_ext = !options.file_extensions.is_empty();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_keywords_are_extracted_from_subqueries() {
        let query = SearchQuery::boolean(
            vec![
                crate::search::query::SubQuery { keyword: "report".into() },
                crate::search::query::SubQuery { keyword: "".into() },
                crate::search::query::SubQuery { keyword: "invoice".into() },
            ],
            BooleanOperator::Or,
        );
        assert_eq!(extract_boolean_keywords(&query), vec!["report".to_string(), "invoice".to_string()]);
    }

    #[test]
    fn simple_mode_uses_the_top_level_keyword() {
        let query = SearchQuery::simple("report");
        let options = SearchOptions::default();
        let index_query = build_index_query(&query, SearchMode::Simple, &options);
        assert_eq!(index_query.terms, vec!["report".to_string()]);
    }

    #[test]
    fn combined_mode_flags_both_filters() {
        let query = SearchQuery::simple("report");
        let options = SearchOptions { file_types: vec![FileTypeTag::Doc], file_extensions: vec!["pdf".into()], ..Default::default() };
        let index_query = build_index_query(&query, SearchMode::Combined, &options);
        assert!(index_query.combine_with_file_type);
        assert!(index_query.combine_with_file_ext);
        assert_eq!(index_query.terms, vec!["report".to_string()]);
    }
}
