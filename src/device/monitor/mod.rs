//! Device monitors (spec.md §4.2, C2): watch the backend for add/remove/
//! change and turn it into an ordered stream of [`MonitorEvent`]s.

pub mod block;
pub mod protocol;
pub mod registry;

pub use block::BlockMonitor;
pub use protocol::ProtocolMonitor;

use crate::device::id::DeviceId;
use crate::device::model::Device;
use crate::device::property::Property;

/// A single change notification (spec.md §4.2 "event ordering").
///
/// Monitors guarantee `Added` for a device precedes any `PropertyChanged`
/// or `Removed` referencing the same id, and never emit `Removed` twice
/// for the same id without an intervening `Added`.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    Added(Device),
    Removed(DeviceId),
    PropertyChanged { id: DeviceId, property: Property },
    MountStateChanged { id: DeviceId, mount_point: Option<String> },
}

/// A source of [`MonitorEvent`]s for one device family (spec.md §4.2).
pub trait DeviceMonitor {
    /// Enumerates every device currently known, emitted as if each had
    /// just appeared (spec.md §4.2 "initial enumeration").
    fn enumerate(&self) -> Vec<Device>;
}
