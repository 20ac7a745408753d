//! Indexed filename/content search strategy (spec.md §4.5.4 "Result
//! processing"), grounded in the original's `FileNameIndexedStrategy`
//! and `ContentIndexedStrategy`.
//!
//! The index engine itself (Lucene-equivalent) is out of scope (spec.md
//! §1 Non-goals). [`IndexClient`] is the seam a real index backend would
//! plug into; this crate only owns the query construction
//! ([`crate::search::builder`]) and the result-processing pipeline below.

use crate::search::builder::build_index_query;
use crate::search::content::{is_content_keyword_long_enough, matches_mixed_query};
use crate::search::error::SearchError;
use crate::search::pinyin::is_hidden_path_or_in_hidden_dir;
use crate::search::planner::{plan, SearchMode};
use crate::search::query::{QueryType, SearchOptions, SearchQuery};
use crate::search::result::{highlight_content, ResultMetadata, SearchResult};
use crate::search::strategy::SearchStrategy;

/// One row an index backend hands back for a query (spec.md §4.5.4).
#[derive(Debug, Clone, Default)]
pub struct IndexedDocument {
    pub path: String,
    pub size: Option<u64>,
    pub modified_time: Option<i64>,
    pub is_directory: bool,
    pub file_type: Option<String>,
    pub content: Option<String>,
    pub filename_hit: bool,
    pub content_hit: bool,
}

/// The seam a real Lucene-equivalent index implements. This crate only
/// needs to run [`crate::search::builder::IndexQuery`] against whatever
/// store is behind it and get matching documents back.
pub trait IndexClient: Send + Sync {
    fn query(&self, index_query: &crate::search::builder::IndexQuery) -> Result<Vec<IndexedDocument>, SearchError>;
}

pub struct IndexedFilenameStrategy<'a> {
    options: SearchOptions,
    client: &'a dyn IndexClient,
}

impl<'a> IndexedFilenameStrategy<'a> {
    pub fn new(options: SearchOptions, client: &'a dyn IndexClient) -> Self {
        Self { options, client }
    }
}

fn passes_result_filter(path: &str, doc_is_hidden: bool, options: &SearchOptions) -> bool {
    if !path.starts_with(&options.search_path) {
        return false;
    }
    if options.search_excluded_paths.iter().any(|p| path.starts_with(p.as_str())) {
        return false;
    }
    if !options.include_hidden && doc_is_hidden {
        return false;
    }
    true
}

fn build_result(doc: &IndexedDocument, detailed: bool) -> SearchResult {
    if !detailed {
        return SearchResult::new(doc.path.clone());
    }
    let metadata = ResultMetadata {
        size: doc.size,
        modified_time: doc.modified_time,
        is_directory: doc.is_directory,
        file_type: doc.file_type.clone(),
        highlighted_content: None,
    };
    SearchResult::with_metadata(doc.path.clone(), metadata)
}

impl<'a> SearchStrategy for IndexedFilenameStrategy<'a> {
    fn search(
        &self,
        query: &SearchQuery,
        is_cancelled: &dyn Fn() -> bool,
        on_result: &mut dyn FnMut(SearchResult) -> bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if self.options.search_path.is_empty() {
            return Err(SearchError::PathIsEmpty);
        }
        if query.query_type == QueryType::Boolean && query.sub_queries.is_empty() {
            return Err(SearchError::InvalidBoolean);
        }
        if !query.has_keyword() && self.options.file_types.is_empty() && self.options.file_extensions.is_empty() {
            return Err(SearchError::KeywordIsEmpty);
        }

        let mode = plan(query, &self.options);
        let index_query = build_index_query(query, mode, &self.options);
        let docs = self.client.query(&index_query)?;

        let mut results = Vec::new();
        for doc in docs {
            if is_cancelled() {
                break;
            }
            let hidden = is_hidden_path_or_in_hidden_dir(&doc.path);
            if !passes_result_filter(&doc.path, hidden, &self.options) {
                continue;
            }
            let result = build_result(&doc, self.options.detailed_results);
            if self.options.stream_results && on_result(result.clone()) {
                return Ok(results);
            }
            results.push(result);
        }

        Ok(results)
    }
}

pub struct IndexedContentStrategy<'a> {
    options: SearchOptions,
    client: &'a dyn IndexClient,
}

impl<'a> IndexedContentStrategy<'a> {
    pub fn new(options: SearchOptions, client: &'a dyn IndexClient) -> Self {
        Self { options, client }
    }
}

impl<'a> SearchStrategy for IndexedContentStrategy<'a> {
    fn search(
        &self,
        query: &SearchQuery,
        is_cancelled: &dyn Fn() -> bool,
        on_result: &mut dyn FnMut(SearchResult) -> bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if self.options.method == crate::search::query::SearchMethod::Realtime {
            return Err(SearchError::InvalidSearchMethod);
        }
        if query.query_type == QueryType::Wildcard {
            return Err(SearchError::WildcardNotSupported);
        }
        if query.query_type != QueryType::Boolean && !is_content_keyword_long_enough(&query.keyword) {
            return Err(SearchError::KeywordTooShort);
        }
        if query.query_type == QueryType::Boolean && query.sub_queries.is_empty() {
            return Err(SearchError::InvalidBoolean);
        }

        let mode = if query.query_type == QueryType::Boolean { SearchMode::Boolean } else { SearchMode::Simple };
        let index_query = build_index_query(query, mode, &self.options);
        let docs = self.client.query(&index_query)?;

        let mixed_and = self.options.content_options.filename_content_mixed_and_enabled;
        let mut results = Vec::new();
        for doc in docs {
            if is_cancelled() {
                break;
            }
            let extension = std::path::Path::new(&doc.path).extension().and_then(|e| e.to_str()).unwrap_or("");
            if !crate::search::content::is_supported_content_search_extension(extension) {
                continue;
            }
            if !matches_mixed_query(doc.filename_hit, doc.content_hit, mixed_and) {
                continue;
            }
            let hidden = is_hidden_path_or_in_hidden_dir(&doc.path);
            if !passes_result_filter(&doc.path, hidden, &self.options) {
                continue;
            }

            let mut result = build_result(&doc, self.options.detailed_results);
            if let Some(content) = &doc.content {
                let keywords: Vec<&str> = index_query.terms.iter().map(String::as_str).collect();
                let snippet = highlight_content(
                    &keywords,
                    content,
                    self.options.content_options.max_preview_length,
                    self.options.content_options.highlight_enabled,
                );
                if let Some(metadata) = result.metadata.as_mut() {
                    metadata.highlighted_content = snippet;
                } else if let Some(snippet) = snippet {
                    result.metadata = Some(ResultMetadata { highlighted_content: Some(snippet), ..Default::default() });
                }
            }

            if self.options.stream_results && on_result(result.clone()) {
                return Ok(results);
            }
            results.push(result);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::builder::IndexQuery;

    struct StubClient(Vec<IndexedDocument>);
    impl IndexClient for StubClient {
        fn query(&self, _: &IndexQuery) -> Result<Vec<IndexedDocument>, SearchError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn rejects_empty_search_path() {
        let client = StubClient(vec![]);
        let strategy = IndexedFilenameStrategy::new(SearchOptions::default(), &client);
        let query = SearchQuery::simple("report");
        assert_eq!(strategy.search(&query, &|| false, &mut |_| false), Err(SearchError::PathIsEmpty));
    }

    #[test]
    fn filters_documents_outside_search_path() {
        let client = StubClient(vec![
            IndexedDocument { path: "/home/alice/report.pdf".into(), ..Default::default() },
            IndexedDocument { path: "/srv/other/report.pdf".into(), ..Default::default() },
        ]);
        let options = SearchOptions { search_path: "/home/alice".into(), ..Default::default() };
        let strategy = IndexedFilenameStrategy::new(options, &client);
        let query = SearchQuery::simple("report");
        let results = strategy.search(&query, &|| false, &mut |_| false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/home/alice/report.pdf");
    }

    #[test]
    fn content_strategy_rejects_realtime_method() {
        let client = StubClient(vec![]);
        let options = SearchOptions { method: crate::search::query::SearchMethod::Realtime, search_path: "/home/alice".into(), ..Default::default() };
        let strategy = IndexedContentStrategy::new(options, &client);
        let query = SearchQuery::simple("report");
        assert_eq!(strategy.search(&query, &|| false, &mut |_| false), Err(SearchError::InvalidSearchMethod));
    }

    #[test]
    fn content_strategy_rejects_short_keyword() {
        let client = StubClient(vec![]);
        let options = SearchOptions { search_path: "/home/alice".into(), ..Default::default() };
        let strategy = IndexedContentStrategy::new(options, &client);
        let query = SearchQuery::simple("a");
        assert_eq!(strategy.search(&query, &|| false, &mut |_| false), Err(SearchError::KeywordTooShort));
    }

    #[test]
    fn mixed_and_requires_both_filename_and_content_hits() {
        let client = StubClient(vec![
            IndexedDocument { path: "/home/alice/a.txt".into(), filename_hit: true, content_hit: false, ..Default::default() },
            IndexedDocument { path: "/home/alice/b.txt".into(), filename_hit: true, content_hit: true, ..Default::default() },
        ]);
        let mut options = SearchOptions { search_path: "/home/alice".into(), ..Default::default() };
        options.content_options.filename_content_mixed_and_enabled = true;
        let strategy = IndexedContentStrategy::new(options, &client);
        let query = SearchQuery::simple("report");
        let results = strategy.search(&query, &|| false, &mut |_| false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/home/alice/b.txt");
    }
}
