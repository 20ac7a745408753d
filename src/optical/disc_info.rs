//! Optical disc state snapshot (spec.md §4.4 "disc info").

use std::path::{Path, PathBuf};

use crate::optical::scsi::probe_dvd_rw_capacity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    CdRom,
    CdR,
    CdRw,
    DvdRom,
    DvdR,
    DvdRw,
    DvdRam,
    DvdPlusR,
    DvdPlusRw,
    DvdPlusRDl,
    BdRom,
    BdR,
    BdRe,
    Unknown,
}

/// A point-in-time read of a drive's loaded media (spec.md §4.4).
///
/// Invariant: `used_size + available_size == total_size`, and for DVD-RW
/// media `total_size` reflects the drive's true writable capacity once
/// it has been probed, not just the space consumed by the current
/// session (spec.md §9 supplemented feature 1).
#[derive(Debug, Clone)]
pub struct OpticalDiscInfo {
    pub device: PathBuf,
    pub volume_name: String,
    pub media_type: MediaType,
    pub blank: bool,
    pub used_size: u64,
    pub available_size: u64,
    pub total_size: u64,
    pub data_blocks: u64,
    pub write_speeds: Vec<String>,
}

impl OpticalDiscInfo {
    pub fn is_consistent(&self) -> bool {
        self.used_size.saturating_add(self.available_size) == self.total_size
    }

    /// Builds the info from the backend's raw properties, applying the
    /// DVD-RW true-capacity correction when the disc reports itself as
    /// entirely used (the backend cannot distinguish "fully burned" from
    /// "rewritable media reporting its current session size" without
    /// this probe).
    pub fn from_backend_properties(
        device: PathBuf,
        media_type: MediaType,
        formatted: bool,
        volume_name: String,
        used_size: u64,
        available_size: u64,
        data_blocks: u64,
        write_speeds: Vec<String>,
    ) -> Self {
        let mut total_size = used_size + available_size;
        let mut used_size = used_size;

        if media_type == MediaType::DvdRw && used_size == total_size {
            let capacity = probe_dvd_rw_capacity(&device);
            if capacity != 0 {
                total_size = capacity;
                used_size = capacity;
            }
        }

        let info = Self {
            device,
            volume_name,
            media_type,
            blank: formatted,
            used_size,
            available_size: total_size - used_size,
            total_size,
            data_blocks,
            write_speeds,
        };
        debug_assert!(info.is_consistent(), "disc info invariant violated: {info:?}");
        info
    }
}

/// Whether `device` currently has media loaded and ready to read, probed
/// via `TEST UNIT READY`-equivalent open-and-stat rather than another
/// SCSI round trip.
pub fn media_present(device: &Path) -> bool {
    std::fs::metadata(device).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_when_sizes_add_up() {
        let info = OpticalDiscInfo {
            device: "/dev/sr0".into(),
            volume_name: "DATA".into(),
            media_type: MediaType::DvdRom,
            blank: false,
            used_size: 600,
            available_size: 400,
            total_size: 1000,
            data_blocks: 100,
            write_speeds: vec![],
        };
        assert!(info.is_consistent());
    }

    #[test]
    fn non_rewritable_media_skips_probe() {
        let info = OpticalDiscInfo::from_backend_properties(
            "/dev/sr0".into(),
            MediaType::DvdRom,
            false,
            "DATA".into(),
            400,
            600,
            100,
            vec![],
        );
        assert_eq!(info.total_size, 1000);
        assert!(info.is_consistent());
    }
}
