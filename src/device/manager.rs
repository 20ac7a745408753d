//! Facade aggregating the block and protocol monitors into a single
//! device registry (spec.md §4.1 "DeviceManager").

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::device::id::DeviceId;
use crate::device::model::Device;
use crate::device::monitor::{BlockMonitor, DeviceMonitor, ProtocolMonitor};

/// Caches the last known state of every device and exposes it by id
/// (spec.md §4.1). Re-enumeration replaces the cache wholesale; callers
/// that need incremental events should consume the monitors directly.
pub struct DeviceManager {
    block: Arc<BlockMonitor>,
    protocol: Arc<ProtocolMonitor>,
    cache: Mutex<HashMap<DeviceId, Device>>,
}

impl DeviceManager {
    pub fn new(block: Arc<BlockMonitor>, protocol: Arc<ProtocolMonitor>) -> Self {
        Self { block, protocol, cache: Mutex::new(HashMap::new()) }
    }

    /// Re-enumerates both monitors and replaces the cache (spec.md §4.1
    /// "initial enumeration"). A failure reading `/proc/self/mounts` is
    /// logged and dropped (spec.md §7 propagation policy) rather than
    /// aborting the whole refresh.
    pub fn refresh(&self) {
        if let Err(err) = self.protocol.rescan_mounts("/proc/self/mounts") {
            log::warn!("protocol mount rescan failed: {err:#}");
        }

        let mut cache = HashMap::new();
        for device in self.block.enumerate() {
            cache.insert(device.id.clone(), device);
        }
        for device in self.protocol.enumerate() {
            cache.insert(device.id.clone(), device);
        }
        *self.cache.lock().unwrap() = cache;
    }

    pub fn get(&self, id: &DeviceId) -> Option<Device> {
        self.cache.lock().unwrap().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Device> {
        self.cache.lock().unwrap().values().cloned().collect()
    }

    pub fn list_mounted(&self) -> Vec<Device> {
        self.cache.lock().unwrap().values().filter(|d| d.is_mounted()).cloned().collect()
    }
}
