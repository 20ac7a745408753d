//! Protocol (gvfs-equivalent) monitor (spec.md §4.2, C2): reconciles
//! `/proc/self/mounts` against the registry to find protocol mounts and
//! evict native/other-user noise (spec.md §9 supplemented feature 4).

use std::sync::Mutex;

use crate::device::id::{DeviceId, DeviceKind};
use crate::device::model::{Capabilities, Capability, Device, MountState, VolumeLinkage};
use crate::device::monitor::registry::{is_mounted_by_other_user, is_native_mount_source, ProtocolRegistry};
use crate::device::monitor::DeviceMonitor;

/// Watches protocol volumes/mounts for the current user.
pub struct ProtocolMonitor {
    current_user: String,
    registry: Mutex<ProtocolRegistry>,
}

impl ProtocolMonitor {
    pub fn new(current_user: impl Into<String>) -> Self {
        Self { current_user: current_user.into(), registry: Mutex::new(ProtocolRegistry::new()) }
    }

    /// Registers a browsed-but-unmounted share (spec.md §4.2).
    pub fn note_volume(&self, uri: &str) {
        self.registry.lock().unwrap().note_volume(uri);
    }

    pub fn forget_volume(&self, uri: &str) {
        self.registry.lock().unwrap().forget_volume(uri);
    }

    /// Re-scans `/proc/self/mounts`, updating the registry for every row
    /// this monitor owns: non-native sources, belonging to the current
    /// user's gvfs-style mount tree (spec.md §4.2 "native-mount
    /// rejection", §9 supplemented feature 4).
    pub fn rescan_mounts(&self, mounts_file: &str) -> anyhow::Result<()> {
        use anyhow::Context;
        let contents = std::fs::read_to_string(mounts_file).with_context(|| format!("reading {mounts_file}"))?;
        let mut registry = self.registry.lock().unwrap();

        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            let Some(source) = fields.next() else { continue };
            let Some(target) = fields.next() else { continue };

            if is_native_mount_source(source) {
                continue;
            }
            if is_mounted_by_other_user(target, &self.current_user) {
                continue;
            }
            if let Some(uri) = uri_for_mount_source(source) {
                registry.note_mount(&uri, target);
            }
        }
        Ok(())
    }

    pub fn linkage(&self, uri: &str) -> Option<VolumeLinkage> {
        self.registry.lock().unwrap().linkage(uri)
    }
}

/// Maps a `/proc/self/mounts` source field back to an activation URI
/// when it encodes one (gvfsd-fuse mounts the source as the URI's
/// scheme, e.g. `smb-share:server=host,share=share`); returns `None` for
/// anything this monitor doesn't own.
fn uri_for_mount_source(source: &str) -> Option<String> {
    let (scheme, rest) = source.split_once("-share:")?;
    let mut server = None;
    let mut share = None;
    for kv in rest.split(',') {
        if let Some(v) = kv.strip_prefix("server=") {
            server = Some(v);
        } else if let Some(v) = kv.strip_prefix("share=") {
            share = Some(v);
        }
    }
    match (server, share) {
        (Some(server), Some(share)) => Some(format!("{scheme}://{server}/{share}")),
        (Some(server), None) => Some(format!("{scheme}://{server}/")),
        _ => None,
    }
}

impl DeviceMonitor for ProtocolMonitor {
    fn enumerate(&self) -> Vec<Device> {
        let registry = self.registry.lock().unwrap();
        registry
            .orphan_mounts()
            .map(|(uri, mount_point)| {
                let caps = Capabilities::new([Capability::Unmountable]);
                let mut device = Device::new_protocol(
                    DeviceId::from_uri(uri),
                    caps,
                    MountState::Mounted { mount_point: mount_point.to_string() },
                    VolumeLinkage::MountOnly,
                );
                device.kind = DeviceKind::Protocol;
                device
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_smb_share_source() {
        assert_eq!(
            uri_for_mount_source("smb-share:server=fileserver,share=public"),
            Some("smb://fileserver/public".to_string())
        );
    }

    #[test]
    fn non_gvfs_source_is_not_owned() {
        assert_eq!(uri_for_mount_source("tmpfs"), None);
    }
}
