//! Block/drive monitor (spec.md §4.2, C2): enumerates
//! `org.freedesktop.UDisks2.Block`/`.Drive`/`.Filesystem` objects and
//! turns the `ObjectManager` signals into [`MonitorEvent`]s.

use crate::device::backend::dbus_proxies::ObjectManagerProxy;
use crate::device::id::{DeviceId, DeviceKind};
use crate::device::model::{Capabilities, Capability, Device, MountState};
use crate::device::monitor::{DeviceMonitor, MonitorEvent};

/// Live connection to the UDisks2-equivalent object tree.
pub struct BlockMonitor {
    connection: zbus::Connection,
}

impl BlockMonitor {
    pub fn new(connection: zbus::Connection) -> Self {
        Self { connection }
    }

    async fn object_manager(&self) -> zbus::Result<ObjectManagerProxy<'_>> {
        ObjectManagerProxy::new(&self.connection).await
    }

    /// Fetches every managed object and turns the ones carrying a `Block`
    /// interface into [`Device`] values (spec.md §4.2 "initial
    /// enumeration").
    pub async fn enumerate_async(&self) -> zbus::Result<Vec<Device>> {
        let manager = self.object_manager().await?;
        let objects = manager.get_managed_objects().await?;

        let mut devices = Vec::new();
        for (path, interfaces) in objects {
            if !interfaces.contains_key("org.freedesktop.UDisks2.Block") {
                continue;
            }
            let id = DeviceId::from_object_path(path.to_string());

            let mount_points = interfaces
                .get("org.freedesktop.UDisks2.Filesystem")
                .and_then(|props| props.get("MountPoints"));
            let mount_state = match mount_points {
                Some(_) => MountState::Mounted { mount_point: String::new() },
                None => MountState::NotMounted,
            };

            let mut caps = vec![Capability::Rescanable];
            if interfaces.contains_key("org.freedesktop.UDisks2.Filesystem") {
                caps.push(Capability::Mountable);
                caps.push(Capability::Unmountable);
            }
            if interfaces.contains_key("org.freedesktop.UDisks2.Encrypted") {
                caps.push(Capability::Lockable);
                caps.push(Capability::Unlockable);
            }

            let mut device = Device::new_block(id, Capabilities::new(caps), mount_state);
            device.kind = DeviceKind::Block;
            devices.push(device);
        }
        Ok(devices)
    }
}

impl DeviceMonitor for BlockMonitor {
    fn enumerate(&self) -> Vec<Device> {
        crate::device::backend::async_sync::block_on(
            async {
                self.enumerate_async()
                    .await
                    .map_err(|e| crate::error::DeviceError::with_message(crate::error::DeviceErrorKind::Unhandled, e.to_string()))
            },
            None,
            None,
        )
        .unwrap_or_default()
    }
}

/// Whether `event` is well-formed per the monitor's own ordering
/// guarantee (spec.md §4.2): only meaningful once a history of events for
/// the same id is available, exposed here so the manager layer can
/// assert it cheaply in tests.
pub fn is_added_before_change(history: &[MonitorEvent], id: &DeviceId) -> bool {
    let mut seen_added = false;
    for event in history {
        match event {
            MonitorEvent::Added(d) if &d.id == id => seen_added = true,
            MonitorEvent::PropertyChanged { id: eid, .. } | MonitorEvent::MountStateChanged { id: eid, .. }
                if eid == id =>
            {
                if !seen_added {
                    return false;
                }
            }
            MonitorEvent::Removed(eid) if eid == id => seen_added = false,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::model::{Capabilities, MountState};

    fn device(id: &str) -> Device {
        Device::new_block(DeviceId::from(id), Capabilities::default(), MountState::NotMounted)
    }

    #[test]
    fn change_before_add_is_rejected() {
        let id = DeviceId::from("/org/freedesktop/UDisks2/block_devices/sda1");
        let history = vec![MonitorEvent::PropertyChanged { id: id.clone(), property: crate::device::property::Property::BlockSize }];
        assert!(!is_added_before_change(&history, &id));
    }

    #[test]
    fn change_after_add_is_accepted() {
        let id = DeviceId::from("/org/freedesktop/UDisks2/block_devices/sda1");
        let history = vec![
            MonitorEvent::Added(device(id.as_str())),
            MonitorEvent::PropertyChanged { id: id.clone(), property: crate::device::property::Property::BlockSize },
        ];
        assert!(is_added_before_change(&history, &id));
    }
}
