//! Burn/erase/checkmedia progress parsing (spec.md §4.4 "job status
//! pipeline").
//!
//! `xorriso` reports progress as free-form text on two channels. The
//! original matched each line against every pattern independently; this
//! pipeline instead tries patterns in a fixed order and stops at the
//! first match (spec.md §9 supplemented feature 2 notes the behavioral
//! difference this introduces for `getCurSpeed`).

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Stalled,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobProgress {
    pub status: JobStatus,
    pub percent: u8,
}

impl JobProgress {
    fn stalled(percent: u8) -> Self {
        Self { status: JobStatus::Stalled, percent }
    }
    fn running(percent: f64) -> Self {
        Self { status: JobStatus::Running, percent: percent.clamp(0.0, 100.0) as u8 }
    }
    fn finished() -> Self {
        Self { status: JobStatus::Finished, percent: 0 }
    }
}

static PERCENT_FIFO_OR_DONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9.]*)%\s*(fifo|done)").unwrap());
static MB_WRITTEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]*)\s*of\s*([0-9]*) MB written").unwrap());
static BLOCKS_READ: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]*) blocks read in ([0-9]*) seconds , ([0-9.]*)x").unwrap());
static CURRENT_SPEED: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]*\.[0-9]x)[bBcCdD.]").unwrap());
static WRITING_COMPLETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"Writing to .* completed successfully\.").unwrap());

/// Accumulates xorriso progress state across a single burn/erase/
/// checkmedia session.
pub struct ProgressParser {
    data_blocks: u64,
    current_speed: Option<String>,
    unmatched_messages: Vec<String>,
}

impl ProgressParser {
    pub fn new(data_blocks: u64) -> Self {
        Self { data_blocks, current_speed: None, unmatched_messages: Vec::new() }
    }

    /// Feeds one raw line from the engine, returning a status update if
    /// this line carried one. Lines that match no pattern are recorded
    /// verbatim (spec.md §4.4), everything else is consumed for its side
    /// effect only.
    pub fn feed(&mut self, raw: &str) -> Option<JobProgress> {
        let msg = raw.trim();

        self.update_current_speed(msg);

        let progress = Self::match_status(msg, self.data_blocks);
        if progress.is_none() {
            self.unmatched_messages.push(msg.to_string());
        }
        progress
    }

    fn match_status(msg: &str, data_blocks: u64) -> Option<JobProgress> {
        if msg.contains("UPDATE : Closing track/session.") {
            return Some(JobProgress::stalled(1));
        }
        if msg.contains("UPDATE : Thank you for being patient.") {
            return Some(JobProgress::stalled(0));
        }
        if let Some(caps) = PERCENT_FIFO_OR_DONE.captures(msg) {
            let percent: f64 = caps[1].parse().unwrap_or(0.0);
            return Some(JobProgress::running(percent));
        }
        if let Some(caps) = MB_WRITTEN.captures(msg) {
            let written: f64 = caps[1].parse().unwrap_or(0.0);
            let total: f64 = caps[2].parse().unwrap_or(0.0);
            if total > 0.0 {
                return Some(JobProgress::running(100.0 * written / total));
            }
        }
        if let Some(caps) = BLOCKS_READ.captures(msg) {
            if data_blocks != 0 {
                let read: f64 = caps[1].parse().unwrap_or(0.0);
                return Some(JobProgress::running(100.0 * read / data_blocks as f64));
            }
        }
        if msg.contains("Blanking done") || WRITING_COMPLETED.is_match(msg) {
            return Some(JobProgress::finished());
        }
        None
    }

    /// Re-derived on every line: a non-matching line clears the speed,
    /// same as the original (spec.md §9 supplemented feature 2).
    fn update_current_speed(&mut self, msg: &str) {
        self.current_speed = CURRENT_SPEED.captures(msg).map(|c| c[1].to_string());
    }

    pub fn current_speed(&self) -> Option<&str> {
        self.current_speed.as_deref()
    }

    pub fn take_unmatched_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unmatched_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_done_reports_running() {
        let mut p = ProgressParser::new(0);
        let progress = p.feed("12.3% done").unwrap();
        assert_eq!(progress, JobProgress { status: JobStatus::Running, percent: 12 });
    }

    #[test]
    fn mb_written_computes_ratio() {
        let mut p = ProgressParser::new(0);
        let progress = p.feed("50 of 200 MB written").unwrap();
        assert_eq!(progress, JobProgress { status: JobStatus::Running, percent: 25 });
    }

    #[test]
    fn blocks_read_needs_nonzero_datablocks() {
        let mut p = ProgressParser::new(0);
        assert!(p.feed("100 blocks read in 5 seconds , 4.0x").is_none());

        let mut p = ProgressParser::new(1000);
        let progress = p.feed("100 blocks read in 5 seconds , 4.0x").unwrap();
        assert_eq!(progress, JobProgress { status: JobStatus::Running, percent: 10 });
    }

    #[test]
    fn stalled_messages_take_priority() {
        let mut p = ProgressParser::new(100);
        let progress = p.feed("UPDATE : Closing track/session.").unwrap();
        assert_eq!(progress, JobProgress { status: JobStatus::Stalled, percent: 1 });
    }

    #[test]
    fn completion_messages_report_finished() {
        let mut p = ProgressParser::new(0);
        assert_eq!(p.feed("Blanking done").unwrap().status, JobStatus::Finished);
        assert_eq!(p.feed("Writing to disc completed successfully.").unwrap().status, JobStatus::Finished);
    }

    #[test]
    fn current_speed_resets_on_nonmatch() {
        let mut p = ProgressParser::new(0);
        p.feed("4.0x.");
        assert_eq!(p.current_speed(), Some("4.0x"));
        p.feed("an unrelated message");
        assert_eq!(p.current_speed(), None);
    }

    #[test]
    fn unmatched_lines_are_recorded() {
        let mut p = ProgressParser::new(0);
        p.feed("some informational line");
        p.feed("12% done");
        assert_eq!(p.take_unmatched_messages(), vec!["some informational line".to_string()]);
    }
}
