//! The mount backend client (spec.md §4.1/§4.2, C1): a typed wrapper over
//! the UDisks2-equivalent D-Bus service, plus the gvfs-equivalent
//! protocol-volume side consumed by [`super::monitor::protocol`].

pub mod async_sync;
pub mod block;
pub mod dbus_proxies;
pub mod protocol;

pub use block::BlockBackend;
pub use protocol::ProtocolBackend;

use crate::device::options::MountOptions;
use crate::error::DeviceError;

/// Operations spec.md §4.1 requires every block device to expose.
pub trait BlockDeviceOps {
    fn mount(&self, options: &MountOptions) -> Result<String, DeviceError>;
    fn unmount(&self, options: &MountOptions) -> Result<(), DeviceError>;
    fn eject(&self, options: &MountOptions) -> Result<(), DeviceError>;
    fn power_off(&self, options: &MountOptions) -> Result<(), DeviceError>;
    fn rename(&self, label: &str, options: &MountOptions) -> Result<(), DeviceError>;
    fn lock(&self, options: &MountOptions) -> Result<(), DeviceError>;
    fn unlock(&self, passphrase: &str, options: &MountOptions) -> Result<String, DeviceError>;
    fn rescan(&self, options: &MountOptions) -> Result<(), DeviceError>;
}

/// Operations spec.md §4.1/§4.3 requires every protocol device to expose.
pub trait ProtocolDeviceOps {
    fn mount(&self, options: &MountOptions) -> Result<String, DeviceError>;
    fn unmount(&self, options: &MountOptions) -> Result<(), DeviceError>;
}
