//! Query value types (spec.md §4.5 "SearchQuery"/"SearchOptions").

/// The syntax a keyword should be interpreted as (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Simple,
    Wildcard,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanOperator {
    #[default]
    And,
    Or,
}

/// One leaf of a boolean query (spec.md §4.5).
#[derive(Debug, Clone)]
pub struct SubQuery {
    pub keyword: String,
}

/// A search request (spec.md §4.5 "SearchQuery").
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keyword: String,
    pub query_type: QueryType,
    pub boolean_operator: BooleanOperator,
    pub sub_queries: Vec<SubQuery>,
}

impl SearchQuery {
    pub fn simple(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into(), query_type: QueryType::Simple, boolean_operator: BooleanOperator::And, sub_queries: Vec::new() }
    }

    pub fn wildcard(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into(), query_type: QueryType::Wildcard, boolean_operator: BooleanOperator::And, sub_queries: Vec::new() }
    }

    pub fn boolean(sub_queries: Vec<SubQuery>, op: BooleanOperator) -> Self {
        Self { keyword: String::new(), query_type: QueryType::Boolean, boolean_operator: op, sub_queries }
    }

    pub fn has_keyword(&self) -> bool {
        !self.keyword.is_empty()
    }
}

/// Which tag-based file category the backend classifies files into
/// (spec.md §4.5.1 "FileType" query mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileTypeTag {
    App,
    Archive,
    Audio,
    Doc,
    Pic,
    Video,
    Dir,
    Other,
}

impl FileTypeTag {
    pub fn name(self) -> &'static str {
        match self {
            FileTypeTag::App => "app",
            FileTypeTag::Archive => "archive",
            FileTypeTag::Audio => "audio",
            FileTypeTag::Doc => "doc",
            FileTypeTag::Pic => "pic",
            FileTypeTag::Video => "video",
            FileTypeTag::Dir => "dir",
            FileTypeTag::Other => "other",
        }
    }
}

/// Every [`FileTypeTag`] the backend supports, in declaration order
/// (spec.md §4.5.1, grounded in `deepinAnythingFileTypes`).
pub const FILE_TYPE_TAGS: &[FileTypeTag] = &[
    FileTypeTag::App,
    FileTypeTag::Archive,
    FileTypeTag::Audio,
    FileTypeTag::Doc,
    FileTypeTag::Pic,
    FileTypeTag::Video,
    FileTypeTag::Dir,
    FileTypeTag::Other,
];

/// Which strategy a search runs through (spec.md §4.5 "SearchOptions").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMethod {
    #[default]
    Indexed,
    Realtime,
}

/// Per-search knobs independent of the keyword itself (spec.md §4.5
/// "SearchOptions").
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub method: SearchMethod,
    pub case_sensitive: bool,
    pub include_hidden: bool,
    pub search_path: String,
    pub max_results: usize,
    pub stream_results: bool,
    pub detailed_results: bool,
    pub sync_timeout_seconds: u64,
    pub pinyin_enabled: bool,
    pub pinyin_acronym_enabled: bool,
    pub file_types: Vec<FileTypeTag>,
    pub file_extensions: Vec<String>,
    pub search_excluded_paths: Vec<String>,
    pub content_search: bool,
    pub content_options: ContentSearchOptions,
}

/// Content-search-only knobs (spec.md §4.5 "Content-specific options").
#[derive(Debug, Clone)]
pub struct ContentSearchOptions {
    pub max_preview_length: usize,
    pub highlight_enabled: bool,
    pub full_text_retrieval_enabled: bool,
    pub filename_content_mixed_and_enabled: bool,
}

impl Default for ContentSearchOptions {
    fn default() -> Self {
        Self { max_preview_length: 50, highlight_enabled: false, full_text_retrieval_enabled: false, filename_content_mixed_and_enabled: false }
    }
}
