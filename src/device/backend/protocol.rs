//! Protocol-device half of the mount backend client (spec.md §4.1/§4.3,
//! C1/C3): talks to the privileged mount-control daemon when available,
//! otherwise defers to the gvfs-equivalent path (spec.md §4.3 "daemon
//! path vs gvfs path").

use std::collections::HashMap;

use zbus::zvariant::Value;

use crate::device::backend::async_sync::block_on;
use crate::device::backend::dbus_proxies::MountControlProxy;
use crate::device::backend::ProtocolDeviceOps;
use crate::device::options::MountOptions;
use crate::error::{DeviceError, DeviceErrorKind};

/// A protocol ("network"/"archive"/...) device addressed by its activation
/// URI (spec.md §3.1).
pub struct ProtocolBackend {
    connection: zbus::Connection,
    uri: String,
}

impl ProtocolBackend {
    pub fn new(connection: zbus::Connection, uri: impl Into<String>) -> Self {
        Self { connection, uri: uri.into() }
    }

    async fn mount_control(&self) -> zbus::Result<MountControlProxy<'_>> {
        MountControlProxy::new(&self.connection).await
    }
}

impl ProtocolDeviceOps for ProtocolBackend {
    fn mount(&self, options: &MountOptions) -> Result<String, DeviceError> {
        block_on(
            async {
                let proxy = self
                    .mount_control()
                    .await
                    .map_err(|e| DeviceError::with_message(DeviceErrorKind::DBusServiceUnknown, e.to_string()))?;
                let zbus_options: HashMap<&str, &Value<'_>> = HashMap::new();
                let (ok, mount_point, errno, err_msg) = proxy
                    .mount(&self.uri, zbus_options)
                    .await
                    .map_err(|e| DeviceError::with_message(DeviceErrorKind::DBusNoReply, e.to_string()))?;
                if ok {
                    Ok(mount_point)
                } else {
                    Err(DeviceError::with_message(errno_to_kind(errno), err_msg))
                }
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn unmount(&self, options: &MountOptions) -> Result<(), DeviceError> {
        let Some(mount_point) = current_mount_point(&self.uri) else {
            return Err(DeviceError::new(DeviceErrorKind::UserNotMounted));
        };
        block_on(
            async {
                let proxy = self
                    .mount_control()
                    .await
                    .map_err(|e| DeviceError::with_message(DeviceErrorKind::DBusServiceUnknown, e.to_string()))?;
                let zbus_options: HashMap<&str, &Value<'_>> = HashMap::new();
                let (ok, errno, err_msg) = proxy
                    .unmount(&mount_point, zbus_options)
                    .await
                    .map_err(|e| DeviceError::with_message(DeviceErrorKind::DBusNoReply, e.to_string()))?;
                if ok {
                    Ok(())
                } else {
                    Err(DeviceError::with_message(errno_to_kind(errno), err_msg))
                }
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }
}

fn errno_to_kind(errno: i32) -> DeviceErrorKind {
    match errno {
        libc::EACCES | libc::EPERM => DeviceErrorKind::IoPermissionDenied,
        libc::EBUSY => DeviceErrorKind::IoBusy,
        libc::ENOENT => DeviceErrorKind::IoNotFound,
        libc::ETIMEDOUT => DeviceErrorKind::IoTimedOut,
        libc::EHOSTUNREACH => DeviceErrorKind::IoHostUnreachable,
        libc::ECONNREFUSED => DeviceErrorKind::IoConnectionRefused,
        _ => DeviceErrorKind::IoFailed,
    }
}

/// Looks up the current mount point for `uri` by scanning
/// `/proc/self/mounts` the way the gvfs path does (spec.md §4.3 note on
/// "already-mounted detection"). Returns `None` if nothing matches.
fn current_mount_point(uri: &str) -> Option<String> {
    let contents = std::fs::read_to_string("/proc/self/mounts").ok()?;
    let Some((_scheme, rest)) = uri.split_once("://") else { return None };
    let host = rest.split('/').next().unwrap_or("");
    contents.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let _source = fields.next()?;
        let target = fields.next()?;
        if target.contains(host) && target.contains("smbmounts") {
            Some(target.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_maps_permission_denied() {
        assert_eq!(errno_to_kind(libc::EACCES), DeviceErrorKind::IoPermissionDenied);
        assert_eq!(errno_to_kind(9999), DeviceErrorKind::IoFailed);
    }
}
