//! Optical disc burning/verification (spec.md §4.4, C4).

pub mod disc_info;
pub mod engine;
pub mod progress;
pub mod scsi;
pub mod udf;

pub use disc_info::{MediaType, OpticalDiscInfo};
pub use engine::{BurnOptions, OpticalDiscManager};
pub use progress::{JobProgress, JobStatus, ProgressParser};
