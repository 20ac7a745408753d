//! Query planning, indexed/realtime execution, and result streaming for
//! filename and content search (spec.md §4.5).

pub mod builder;
pub mod content;
pub mod engine;
pub mod error;
pub mod index_availability;
pub mod pinyin;
pub mod planner;
pub mod query;
pub mod result;
pub mod strategy;

pub use engine::{SearchEngine, SearchOutcome};
pub use error::SearchError;
pub use planner::SearchMode;
pub use query::{
    BooleanOperator, ContentSearchOptions, FileTypeTag, QueryType, SearchMethod, SearchOptions, SearchQuery, SubQuery,
    FILE_TYPE_TAGS,
};
pub use result::{ResultMetadata, SearchResult};
pub use strategy::SearchStrategy;
