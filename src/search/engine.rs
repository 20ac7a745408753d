//! Search engine skeleton (spec.md §4.5.6), grounded in the original's
//! `GenericSearchEngine` / `SearchWorker`.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::SEARCH_BATCH_FLUSH_INTERVAL;
use crate::search::error::SearchError;
use crate::search::query::{QueryType, SearchOptions, SearchQuery, FILE_TYPE_TAGS};
use crate::search::result::SearchResult;
use crate::search::strategy::SearchStrategy;

/// Terminal outcome of a completed search (spec.md §5 "Ordering
/// guarantees": `searchStarted → resultsFound* → (searchFinished |
/// searchCancelled | errorOccurred)`).
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Finished(Vec<SearchResult>),
    Cancelled,
}

fn validate(query: &SearchQuery, options: &SearchOptions) -> Result<(), SearchError> {
    if query.query_type == QueryType::Boolean {
        if query.sub_queries.is_empty() {
            return Err(SearchError::InvalidBoolean);
        }
    } else {
        if options.search_path.is_empty() {
            return Err(SearchError::PathIsEmpty);
        }
        let path = Path::new(&options.search_path);
        if !path.is_dir() {
            return Err(SearchError::PathNotFound);
        }
        if std::fs::read_dir(path).is_err() {
            return Err(SearchError::PermissionDenied);
        }
        if !query.has_keyword() && options.file_types.is_empty() && options.file_extensions.is_empty() {
            return Err(SearchError::KeywordIsEmpty);
        }
    }

    if !options.file_types.iter().all(|t| FILE_TYPE_TAGS.contains(t)) {
        return Err(SearchError::InvalidFileTypes);
    }

    Ok(())
}

/// Owns one dedicated worker thread and a pluggable [`SearchStrategy`]
/// (spec.md §4.5.6 "Engine skeleton").
pub struct SearchEngine {
    options: Mutex<SearchOptions>,
    cancelled: Arc<AtomicBool>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self { options: Mutex::new(SearchOptions::default()), cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn set_options(&self, options: SearchOptions) {
        *self.options.lock().unwrap() = options;
    }

    pub fn options(&self) -> SearchOptions {
        self.options.lock().unwrap().clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Runs `query` through `strategy` on a dedicated worker thread,
    /// batching results and flushing them via `on_batch` every
    /// [`SEARCH_BATCH_FLUSH_INTERVAL`] while the search is in flight
    /// (spec.md §4.5.6 "batch queue").
    pub fn search<S>(&self, query: SearchQuery, strategy: S, mut on_batch: impl FnMut(Vec<SearchResult>) + Send + 'static) -> Result<SearchOutcome, SearchError>
    where
        S: SearchStrategy + 'static,
    {
        let options = self.options();
        validate(&query, &options)?;

        self.cancelled.store(false, Ordering::SeqCst);
        let cancelled = self.cancelled.clone();
        let (tx, rx) = crossbeam_channel::unbounded::<SearchResult>();
        let cancelled_for_worker = cancelled.clone();

        let worker = thread::spawn(move || -> Result<Vec<SearchResult>, SearchError> {
            let is_cancelled = || cancelled_for_worker.load(Ordering::SeqCst);
            let mut on_result = |result: SearchResult| {
                let _ = tx.send(result);
                is_cancelled()
            };
            strategy.search(&query, &is_cancelled, &mut on_result)
        });

        let mut pending: Vec<SearchResult> = Vec::new();
        loop {
            match rx.recv_timeout(SEARCH_BATCH_FLUSH_INTERVAL) {
                Ok(result) => {
                    pending.push(result);
                    while let Ok(result) = rx.try_recv() {
                        pending.push(result);
                    }
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                    if !pending.is_empty() {
                        on_batch(std::mem::take(&mut pending));
                    }
                    break;
                }
            }
            if !pending.is_empty() {
                on_batch(std::mem::take(&mut pending));
            }
        }

        let results = worker.join().expect("search worker thread panicked")?;

        if cancelled.load(Ordering::SeqCst) {
            Ok(SearchOutcome::Cancelled)
        } else {
            Ok(SearchOutcome::Finished(results))
        }
    }

    /// `search` with a `true`-to-cancel per-result callback instead of
    /// batches (spec.md §4.5.6 `search_with_callback`).
    pub fn search_with_callback<S>(&self, query: SearchQuery, strategy: S, mut callback: impl FnMut(&SearchResult) -> bool + Send + 'static) -> Result<SearchOutcome, SearchError>
    where
        S: SearchStrategy + 'static,
    {
        let options = self.options();
        validate(&query, &options)?;

        self.cancelled.store(false, Ordering::SeqCst);
        let cancelled = self.cancelled.clone();
        let is_cancelled = move || cancelled.load(Ordering::SeqCst);
        let mut on_result = |result: SearchResult| callback(&result);
        let results = strategy.search(&query, &is_cancelled, &mut on_result)?;

        if is_cancelled() {
            Ok(SearchOutcome::Cancelled)
        } else {
            Ok(SearchOutcome::Finished(results))
        }
    }

    /// Blocks the calling thread for up to `deadline`, cancelling the
    /// worker on timeout (spec.md §4.5.6 `search_sync`).
    pub fn search_sync<S>(&self, query: SearchQuery, strategy: S, deadline: Duration) -> Result<SearchOutcome, SearchError>
    where
        S: SearchStrategy + 'static,
    {
        let options = self.options();
        validate(&query, &options)?;

        self.cancelled.store(false, Ordering::SeqCst);
        let cancelled = self.cancelled.clone();
        let cancelled_for_worker = cancelled.clone();

        let worker = thread::spawn(move || -> Result<Vec<SearchResult>, SearchError> {
            let is_cancelled = || cancelled_for_worker.load(Ordering::SeqCst);
            let mut on_result = |_: SearchResult| is_cancelled();
            strategy.search(&query, &is_cancelled, &mut on_result)
        });

        let start = Instant::now();
        loop {
            if worker.is_finished() {
                break;
            }
            if start.elapsed() >= deadline {
                cancelled.store(true, Ordering::SeqCst);
                let _ = worker.join();
                return Err(SearchError::SearchTimeout);
            }
            thread::sleep(Duration::from_millis(10));
        }

        let results = worker.join().expect("search worker thread panicked")?;
        if cancelled.load(Ordering::SeqCst) {
            Ok(SearchOutcome::Cancelled)
        } else {
            Ok(SearchOutcome::Finished(results))
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::strategy::realtime::RealtimeFilenameStrategy;

    #[test]
    fn empty_path_is_rejected_before_spawning_a_worker() {
        let engine = SearchEngine::new();
        engine.set_options(SearchOptions::default());
        let query = SearchQuery::simple("report");
        let strategy = RealtimeFilenameStrategy::new(SearchOptions::default());
        let result = engine.search(query, strategy, |_| {});
        assert!(matches!(result, Err(SearchError::PathIsEmpty)));
    }

    #[test]
    fn boolean_with_no_subqueries_is_rejected() {
        let engine = SearchEngine::new();
        let options = SearchOptions { search_path: "/tmp".into(), ..Default::default() };
        engine.set_options(options.clone());
        let query = SearchQuery::boolean(vec![], crate::search::query::BooleanOperator::And);
        let strategy = RealtimeFilenameStrategy::new(options);
        let result = engine.search(query, strategy, |_| {});
        assert!(matches!(result, Err(SearchError::InvalidBoolean)));
    }

    #[test]
    fn finds_results_in_a_real_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("report.txt"), "hi").unwrap();
        let options = SearchOptions { search_path: tmp.path().to_string_lossy().to_string(), include_hidden: true, ..Default::default() };
        let engine = SearchEngine::new();
        engine.set_options(options.clone());
        let query = SearchQuery::simple("report");
        let strategy = RealtimeFilenameStrategy::new(options);
        let outcome = engine.search_sync(query, strategy, Duration::from_secs(5)).unwrap();
        match outcome {
            SearchOutcome::Finished(results) => assert_eq!(results.len(), 1),
            SearchOutcome::Cancelled => panic!("expected Finished"),
        }
    }
}
