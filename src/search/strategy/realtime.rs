//! Non-recursive filesystem walk fallback for filename search (spec.md
//! §4.5.5), grounded in the original's `FileNameRealTimeStrategy::search`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::search::error::SearchError;
use crate::search::pinyin::is_hidden_path_or_in_hidden_dir;
use crate::search::query::{BooleanOperator, SearchOptions, SearchQuery};
use crate::search::result::{ResultMetadata, SearchResult};
use crate::search::strategy::SearchStrategy;

pub struct RealtimeFilenameStrategy {
    options: SearchOptions,
}

impl RealtimeFilenameStrategy {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }
}

fn matches_simple(file_name: &str, keyword: &str, case_sensitive: bool) -> bool {
    if keyword.is_empty() {
        return true;
    }
    if case_sensitive {
        file_name.contains(keyword)
    } else {
        file_name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Realtime search never supports pinyin or wildcard expansion (spec.md
/// §4.5.5) — boolean queries fall back to plain substring matching per term.
fn matches_boolean(file_name: &str, query: &SearchQuery, case_sensitive: bool) -> bool {
    if query.sub_queries.is_empty() {
        return matches_simple(file_name, &query.keyword, case_sensitive);
    }
    match query.boolean_operator {
        BooleanOperator::And => query.sub_queries.iter().all(|s| matches_simple(file_name, &s.keyword, case_sensitive)),
        BooleanOperator::Or => query.sub_queries.iter().any(|s| matches_simple(file_name, &s.keyword, case_sensitive)),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default()
}

/// Attaches `{size, modified_time, is_directory, file_type}` the way the
/// original's `FileNameResultAPI` does, using the extension as the file
/// type or "directory"/"unknown" when there isn't one (spec.md §4.5.5
/// rule 4).
fn build_result(path: &Path, is_dir: bool, detailed: bool) -> SearchResult {
    let path_str = path.to_string_lossy().to_string();
    if !detailed {
        return SearchResult::new(path_str);
    }

    let meta = std::fs::metadata(path).ok();
    let size = meta.as_ref().filter(|_| !is_dir).map(|m| m.len());
    let modified_time = meta
        .as_ref()
        .and_then(|m| m.modified().ok())
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64);
    let extension = extension_of(path);
    let file_type = if !extension.is_empty() {
        extension
    } else if is_dir {
        "directory".to_string()
    } else {
        "unknown".to_string()
    };

    SearchResult::with_metadata(
        path_str,
        ResultMetadata { size, modified_time, is_directory: is_dir, file_type: Some(file_type), highlighted_content: None },
    )
}

impl SearchStrategy for RealtimeFilenameStrategy {
    fn search(
        &self,
        query: &SearchQuery,
        is_cancelled: &dyn Fn() -> bool,
        on_result: &mut dyn FnMut(SearchResult) -> bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        use crate::search::query::QueryType;

        let root = Path::new(&self.options.search_path);
        if !root.is_dir() {
            return Err(SearchError::PathNotFound);
        }

        let max_results = if self.options.max_results == 0 { usize::MAX } else { self.options.max_results };
        let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut results: Vec<SearchResult> = Vec::new();

        'outer: while let Some(dir) = stack.pop() {
            if is_cancelled() || results.len() >= max_results {
                break;
            }

            let canonical = std::fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
            if !visited.insert(canonical) {
                continue;
            }

            let dir_str = dir.to_string_lossy();
            if self.options.search_excluded_paths.iter().any(|p| dir_str.starts_with(p.as_str())) {
                continue;
            }

            let entries = match std::fs::read_dir(&dir) {
                Ok(e) => e,
                Err(_) => continue,
            };

            let mut sorted: Vec<std::fs::DirEntry> = entries.filter_map(Result::ok).collect();
            sorted.sort_by_key(|e| e.file_name());

            for entry in sorted {
                if is_cancelled() || results.len() >= max_results {
                    break 'outer;
                }

                let path = entry.path();
                let path_str = path.to_string_lossy().to_string();

                if !self.options.include_hidden && is_hidden_path_or_in_hidden_dir(&path_str) {
                    continue;
                }

                let Ok(file_type) = entry.file_type() else { continue };
                if file_type.is_dir() {
                    if file_type.is_symlink() {
                        continue;
                    }
                    stack.push(path.clone());
                }

                let file_name = entry.file_name().to_string_lossy().to_string();
                let mut matches = match query.query_type {
                    QueryType::Boolean => matches_boolean(&file_name, query, self.options.case_sensitive),
                    _ => matches_simple(&file_name, &query.keyword, self.options.case_sensitive),
                };

                if matches && !self.options.file_extensions.is_empty() {
                    matches = self.options.file_extensions.iter().any(|e| e.to_lowercase() == extension_of(&path));
                }

                if !matches {
                    continue;
                }

                let result = build_result(&path, file_type.is_dir(), self.options.detailed_results);
                if self.options.stream_results && on_result(result.clone()) {
                    return Ok(results);
                }
                results.push(result);
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::SearchQuery;

    fn write_tree(dir: &Path) {
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("report.txt"), "hello").unwrap();
        std::fs::write(dir.join("sub/report2.txt"), "hello").unwrap();
        std::fs::write(dir.join(".hidden.txt"), "hello").unwrap();
    }

    #[test]
    fn finds_matching_files_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        write_tree(tmp.path());
        let options = SearchOptions { search_path: tmp.path().to_string_lossy().to_string(), include_hidden: true, ..Default::default() };
        let strategy = RealtimeFilenameStrategy::new(options);
        let query = SearchQuery::simple("report");
        let results = strategy.search(&query, &|| false, &mut |_| false).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn detailed_results_attach_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        write_tree(tmp.path());
        let options = SearchOptions {
            search_path: tmp.path().to_string_lossy().to_string(),
            include_hidden: true,
            detailed_results: true,
            ..Default::default()
        };
        let strategy = RealtimeFilenameStrategy::new(options);
        let query = SearchQuery::simple("report.txt");
        let results = strategy.search(&query, &|| false, &mut |_| false).unwrap();
        assert_eq!(results.len(), 1);
        let metadata = results[0].metadata.as_ref().expect("detailed_results should attach metadata");
        assert_eq!(metadata.file_type.as_deref(), Some("txt"));
        assert!(!metadata.is_directory);
        assert_eq!(metadata.size, Some(5));
    }

    #[test]
    fn hidden_files_excluded_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        write_tree(tmp.path());
        let options = SearchOptions { search_path: tmp.path().to_string_lossy().to_string(), include_hidden: false, ..Default::default() };
        let strategy = RealtimeFilenameStrategy::new(options);
        let query = SearchQuery::simple("hidden");
        let results = strategy.search(&query, &|| false, &mut |_| false).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn missing_path_is_rejected() {
        let options = SearchOptions { search_path: "/no/such/path".into(), ..Default::default() };
        let strategy = RealtimeFilenameStrategy::new(options);
        let query = SearchQuery::simple("x");
        assert_eq!(strategy.search(&query, &|| false, &mut |_| false), Err(SearchError::PathNotFound));
    }

    #[test]
    fn cancellation_stops_the_walk_early() {
        let tmp = tempfile::tempdir().unwrap();
        write_tree(tmp.path());
        let options = SearchOptions { search_path: tmp.path().to_string_lossy().to_string(), include_hidden: true, ..Default::default() };
        let strategy = RealtimeFilenameStrategy::new(options);
        let query = SearchQuery::simple("report");
        let results = strategy.search(&query, &|| true, &mut |_| false).unwrap();
        assert!(results.is_empty());
    }
}
