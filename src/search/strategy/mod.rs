//! Pluggable search strategies (spec.md §4.5.6 "Engine skeleton"),
//! grounded in the original's `BaseSearchStrategy`.

pub mod indexed;
pub mod realtime;

use crate::search::error::SearchError;
use crate::search::query::SearchQuery;
use crate::search::result::SearchResult;

/// One way of actually running a query: walking the filesystem, or
/// consulting an index. `is_cancelled` is polled between results;
/// `on_result` is invoked as each match is found and, if it returns
/// `true`, aborts the search early (spec.md §5 "Cancellation").
pub trait SearchStrategy: Send {
    fn search(
        &self,
        query: &SearchQuery,
        is_cancelled: &dyn Fn() -> bool,
        on_result: &mut dyn FnMut(SearchResult) -> bool,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
