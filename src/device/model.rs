//! The `Device` value and its invariants (spec.md §3.1).

use std::collections::HashSet;

use crate::device::id::{DeviceId, DeviceKind};
use crate::error::DeviceError;

/// Which operations are meaningful for a given device (spec.md §3.1
/// "Capability set").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Mountable,
    Unmountable,
    Ejectable,
    PowerOffable,
    Renamable,
    Lockable,
    Unlockable,
    Rescanable,
}

#[derive(Debug, Clone, Default)]
pub struct Capabilities(HashSet<Capability>);

impl Capabilities {
    pub fn new(caps: impl IntoIterator<Item = Capability>) -> Self {
        Self(caps.into_iter().collect())
    }

    pub fn has(&self, cap: Capability) -> bool {
        self.0.contains(&cap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountState {
    NotMounted,
    Mounted { mount_point: String },
}

impl MountState {
    pub fn mount_point(&self) -> Option<&str> {
        match self {
            MountState::NotMounted => None,
            MountState::Mounted { mount_point } => Some(mount_point),
        }
    }

    /// Invariant: `mount_point` is non-empty iff state is `Mounted`
    /// (spec.md §3.1).
    pub fn is_consistent(&self) -> bool {
        match self {
            MountState::NotMounted => true,
            MountState::Mounted { mount_point } => !mount_point.is_empty(),
        }
    }
}

/// Whether a protocol device exists as a volume, a mount, or both
/// (spec.md §3.1 "Volume linkage").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLinkage {
    VolumeOnly,
    MountOnly,
    Both,
}

/// A polymorphic device value (spec.md §3.1).
#[derive(Debug, Clone)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub capabilities: Capabilities,
    pub mount_state: MountState,
    pub volume_linkage: Option<VolumeLinkage>,
    pub last_error: Option<DeviceError>,
}

impl Device {
    pub fn new_block(id: DeviceId, capabilities: Capabilities, mount_state: MountState) -> Self {
        Self {
            id,
            kind: DeviceKind::Block,
            capabilities,
            mount_state,
            volume_linkage: None,
            last_error: None,
        }
    }

    pub fn new_protocol(
        id: DeviceId,
        capabilities: Capabilities,
        mount_state: MountState,
        volume_linkage: VolumeLinkage,
    ) -> Self {
        Self {
            id,
            kind: DeviceKind::Protocol,
            capabilities,
            mount_state,
            volume_linkage: Some(volume_linkage),
            last_error: None,
        }
    }

    pub fn set_last_error(&mut self, err: DeviceError) {
        self.last_error = Some(err);
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.mount_state, MountState::Mounted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_state_invariant_holds_for_not_mounted() {
        assert!(MountState::NotMounted.is_consistent());
    }

    #[test]
    fn mount_state_invariant_rejects_empty_mount_point() {
        assert!(!MountState::Mounted { mount_point: String::new() }.is_consistent());
        assert!(MountState::Mounted { mount_point: "/media/x".into() }.is_consistent());
    }

    #[test]
    fn capability_lookup() {
        let caps = Capabilities::new([Capability::Mountable, Capability::Ejectable]);
        assert!(caps.has(Capability::Mountable));
        assert!(!caps.has(Capability::Lockable));
    }
}
