//! Reconciliation bookkeeping shared by the protocol monitor (spec.md
//! §4.2 "volume/mount reconciliation", §9 supplemented feature 4).
//!
//! gvfs reports volumes and mounts for the same network share as two
//! independent streams, keyed by activation URI on the volume side and
//! by mount-root URI on the mount side. A share can appear as
//! volume-only (browsed but not mounted), mount-only (mounted by
//! another process, e.g. a prior session), or both.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::device::model::VolumeLinkage;

#[derive(Debug, Clone, Default)]
struct ProtocolEntry {
    has_volume: bool,
    mount_point: Option<String>,
}

/// Tracks volume/mount presence per activation URI and reconciles the two
/// streams into a [`VolumeLinkage`] (spec.md §3.1).
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    entries: HashMap<String, ProtocolEntry>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_volume(&mut self, uri: &str) {
        self.entries.entry(uri.to_string()).or_default().has_volume = true;
    }

    pub fn forget_volume(&mut self, uri: &str) -> bool {
        let Some(entry) = self.entries.get_mut(uri) else { return false };
        entry.has_volume = false;
        self.evict_if_empty(uri)
    }

    pub fn note_mount(&mut self, uri: &str, mount_point: impl Into<String>) {
        self.entries.entry(uri.to_string()).or_default().mount_point = Some(mount_point.into());
    }

    pub fn forget_mount(&mut self, uri: &str) -> bool {
        let Some(entry) = self.entries.get_mut(uri) else { return false };
        entry.mount_point = None;
        self.evict_if_empty(uri)
    }

    /// Drops the entry once both sides are gone. Returns whether the
    /// entry was removed (spec.md §4.2: this is what triggers `Removed`
    /// for the device as a whole).
    fn evict_if_empty(&mut self, uri: &str) -> bool {
        let empty = self.entries.get(uri).is_some_and(|e| !e.has_volume && e.mount_point.is_none());
        if empty {
            self.entries.remove(uri);
        }
        empty
    }

    pub fn linkage(&self, uri: &str) -> Option<VolumeLinkage> {
        let entry = self.entries.get(uri)?;
        match (entry.has_volume, entry.mount_point.is_some()) {
            (true, true) => Some(VolumeLinkage::Both),
            (true, false) => Some(VolumeLinkage::VolumeOnly),
            (false, true) => Some(VolumeLinkage::MountOnly),
            (false, false) => None,
        }
    }

    pub fn mount_point(&self, uri: &str) -> Option<&str> {
        self.entries.get(uri)?.mount_point.as_deref()
    }

    /// Mount-only entries with no known volume: mounted by a separate
    /// process before this monitor started (spec.md §4.2 "orphan
    /// mounts").
    pub fn orphan_mounts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(uri, e)| e.mount_point.as_deref().filter(|_| !e.has_volume).map(|mp| (uri.as_str(), mp)))
    }
}

/// Native block-backed mounts are reported by the block monitor; the
/// protocol monitor must ignore any `/proc/self/mounts` row whose source
/// device starts with `/dev/` (spec.md §4.2 "native-mount rejection").
pub fn is_native_mount_source(source: &str) -> bool {
    source.starts_with("/dev/")
}

/// `^/(?:run/)?media/<user>/smbmounts/` — detects a share mounted by a
/// different user's session under the shared `smbmounts` convention
/// (spec.md §9 supplemented feature 4, grounded in the original's
/// mounted-by-other-user check).
static MOUNTED_BY_OTHER_USER_TEMPLATE: &str = r"^/(?:run/)?media/{user}/smbmounts/";

pub fn is_mounted_by_other_user(mount_point: &str, current_user: &str) -> bool {
    static CACHE: Lazy<std::sync::Mutex<HashMap<String, Regex>>> = Lazy::new(Default::default);
    let mut cache = CACHE.lock().unwrap();
    let re = cache.entry(current_user.to_string()).or_insert_with(|| {
        let pattern = MOUNTED_BY_OTHER_USER_TEMPLATE.replace("{user}", &regex::escape(current_user));
        Regex::new(&pattern).expect("template always compiles")
    });
    !re.is_match(mount_point) && looks_like_other_users_smbmount(mount_point)
}

fn looks_like_other_users_smbmount(mount_point: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/(?:run/)?media/[^/]+/smbmounts/").unwrap());
    RE.is_match(mount_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_then_mount_reconciles_to_both() {
        let mut reg = ProtocolRegistry::new();
        reg.note_volume("smb://host/share");
        assert_eq!(reg.linkage("smb://host/share"), Some(VolumeLinkage::VolumeOnly));
        reg.note_mount("smb://host/share", "/run/user/1000/gvfs/smb-share:server=host,share=share");
        assert_eq!(reg.linkage("smb://host/share"), Some(VolumeLinkage::Both));
    }

    #[test]
    fn forgetting_both_sides_evicts_entry() {
        let mut reg = ProtocolRegistry::new();
        reg.note_volume("smb://host/share");
        reg.note_mount("smb://host/share", "/mnt/x");
        assert!(!reg.forget_volume("smb://host/share"));
        assert!(reg.forget_mount("smb://host/share"));
        assert_eq!(reg.linkage("smb://host/share"), None);
    }

    #[test]
    fn mount_only_entry_is_orphan() {
        let mut reg = ProtocolRegistry::new();
        reg.note_mount("smb://host/share", "/mnt/x");
        let orphans: Vec<_> = reg.orphan_mounts().collect();
        assert_eq!(orphans, vec![("smb://host/share", "/mnt/x")]);
    }

    #[test]
    fn native_mount_rejected_by_dev_prefix() {
        assert!(is_native_mount_source("/dev/sda1"));
        assert!(!is_native_mount_source("//host/share"));
    }

    #[test]
    fn other_user_smbmount_detected() {
        assert!(is_mounted_by_other_user("/media/bob/smbmounts/share", "alice"));
        assert!(!is_mounted_by_other_user("/media/alice/smbmounts/share", "alice"));
        assert!(!is_mounted_by_other_user("/mnt/manual", "alice"));
    }
}
