//! Search result value types and content highlighting (spec.md §4.5.3
//! "SearchResult"/"Highlight algorithm"), grounded in the original's
//! `ContentHighlighter::customHighlight`.

/// Per-result metadata attached when `detailed_results` is requested
/// (spec.md §4.5 "SearchOptions"). `file_type` is the extension (or
/// "directory"/"unknown" when there isn't one), matching the original's
/// `FileNameResultAPI::setFileType` — not the [`crate::search::query::FileTypeTag`]
/// category used to filter a query, which is a different axis entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMetadata {
    pub size: Option<u64>,
    pub modified_time: Option<i64>,
    pub is_directory: bool,
    pub file_type: Option<String>,
    pub highlighted_content: Option<String>,
}

/// One match emitted by a search strategy (spec.md §4.5.3 "SearchResult").
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub path: String,
    pub metadata: Option<ResultMetadata>,
}

impl SearchResult {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), metadata: None }
    }

    pub fn with_metadata(path: impl Into<String>, metadata: ResultMetadata) -> Self {
        Self { path: path.into(), metadata: Some(metadata) }
    }
}

struct KeywordMatch<'a> {
    position: usize,
    length: usize,
    keyword: &'a str,
}

/// The first (lowest-offset) keyword any of `keywords` matches in
/// `content`, case-insensitively.
fn find_first_keyword_match<'a>(content: &str, keywords: &[&'a str]) -> Option<KeywordMatch<'a>> {
    let lower = content.to_lowercase();
    let mut best: Option<KeywordMatch<'a>> = None;
    for &keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        if let Some(pos) = lower.find(&keyword.to_lowercase()) {
            if best.as_ref().map_or(true, |b| pos < b.position) {
                best = Some(KeywordMatch { position: pos, length: keyword.len(), keyword });
            }
        }
    }
    best
}

/// Picks a window start so the match sits roughly centered within
/// `max_length`, snapping to the nearest preceding newline when that
/// keeps the window within budget (spec.md §4.5.3 "Highlight algorithm").
fn find_optimal_start_position(content: &str, keyword_pos: usize, max_length: usize) -> usize {
    if keyword_pos == 0 {
        return 0;
    }
    let ideal_before = max_length / 2;
    let ideal_after = max_length - ideal_before;

    if keyword_pos <= ideal_before {
        return 0;
    }
    if keyword_pos + ideal_after >= content.len() {
        return content.len().saturating_sub(max_length);
    }

    let mut start = keyword_pos - ideal_before;
    if let Some(last_newline) = content[..keyword_pos].rfind('\n') {
        if last_newline > start {
            start = last_newline + 1;
        }
    }
    if keyword_pos - start + ideal_after > max_length {
        start = keyword_pos.saturating_sub(max_length - ideal_after);
    }
    start
}

fn find_optimal_end_position(content: &str, keyword_pos: usize, keyword_len: usize, max_length: usize, start_pos: usize) -> usize {
    let ideal_before = keyword_pos - start_pos;
    let ideal_after = max_length - ideal_before;

    if keyword_pos + keyword_len >= content.len() {
        return content.len();
    }

    let mut end = keyword_pos + keyword_len + ideal_after;
    if let Some(rel_newline) = content[keyword_pos + keyword_len..].find('\n') {
        let next_newline = keyword_pos + keyword_len + rel_newline;
        if next_newline < end {
            end = next_newline;
        }
    }
    if end - start_pos > max_length {
        end = start_pos + max_length;
    }
    end.min(content.len())
}

/// Wraps every case-insensitive occurrence of `keyword` in `text` with
/// `<b>…</b>`.
fn highlight_keyword(text: &str, keyword: &str) -> String {
    if text.is_empty() || keyword.is_empty() {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_keyword = keyword.to_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(rel) = lower_text[pos..].find(&lower_keyword) {
        let match_start = pos + rel;
        let match_end = match_start + keyword.len();
        result.push_str(&text[pos..match_start]);
        result.push_str("<b>");
        result.push_str(&text[match_start..match_end]);
        result.push_str("</b>");
        pos = match_end;
    }
    result.push_str(&text[pos..]);
    result
}

/// Repeatedly collapses `</b><b>` pairs left behind by adjacent
/// highlighted matches until no more remain.
fn merge_adjacent_highlight_tags(text: &str) -> String {
    let mut result = text.to_string();
    loop {
        let replaced = result.replace("</b><b>", "");
        if replaced == result {
            return replaced;
        }
        result = replaced;
    }
}

/// Builds a highlighted content snippet around the first keyword match
/// (spec.md §4.5.3 "Highlight algorithm"). Returns `None` when `content`
/// is empty, `keywords` is empty, or no keyword matches.
pub fn highlight_content(keywords: &[&str], content: &str, max_length: usize, enable_html: bool) -> Option<String> {
    if content.is_empty() || keywords.is_empty() {
        return None;
    }

    let found = find_first_keyword_match(content, keywords)?;

    if found.length >= max_length {
        return Some(found.keyword.to_string());
    }

    let start = find_optimal_start_position(content, found.position, max_length);
    let end = find_optimal_end_position(content, found.position, found.length, max_length, start);
    let mut snippet = content[start..end].trim().to_string();

    if enable_html {
        for &keyword in keywords {
            snippet = highlight_keyword(&snippet, keyword);
        }
        snippet = merge_adjacent_highlight_tags(&snippet);
    }

    Some(snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_earliest_match_among_keywords() {
        let found = find_first_keyword_match("the quick brown fox", &["fox", "quick"]).unwrap();
        assert_eq!(found.keyword, "quick");
        assert_eq!(found.position, 4);
    }

    #[test]
    fn short_keyword_exceeding_window_returns_keyword_alone() {
        let content = "x".repeat(100);
        let snippet = highlight_content(&[content.as_str()], &content, 10, false).unwrap();
        assert_eq!(snippet, content);
    }

    #[test]
    fn highlights_and_merges_adjacent_matches() {
        let snippet = highlight_content(&["ab"], "abab", 50, true).unwrap();
        assert_eq!(snippet, "<b>ab</b><b>ab</b>".replace("</b><b>", ""));
    }

    #[test]
    fn no_match_returns_none() {
        assert!(highlight_content(&["zzz"], "hello world", 50, false).is_none());
    }

    #[test]
    fn empty_content_returns_none() {
        assert!(highlight_content(&["hello"], "", 50, false).is_none());
    }
}
