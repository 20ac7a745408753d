//! Block-device half of the mount backend client (spec.md §4.1, C1).

use std::collections::HashMap;

use zbus::zvariant::Value;

use crate::device::backend::async_sync::block_on;
use crate::device::backend::dbus_proxies::{BlockProxy, DriveProxy, EncryptedProxy, FilesystemProxy};
use crate::device::backend::BlockDeviceOps;
use crate::device::options::MountOptions;
use crate::error::{from_backend_error_name, DeviceError, DeviceErrorKind};

fn map_zbus_error(err: zbus::Error) -> DeviceError {
    match &err {
        zbus::Error::MethodError(name, detail, _) => {
            let kind = from_backend_error_name(name.as_str());
            match detail {
                Some(msg) => DeviceError::with_message(kind, msg.clone()),
                None => DeviceError::new(kind),
            }
        }
        zbus::Error::InputOutput(_) => DeviceError::new(DeviceErrorKind::IoFailed),
        _ => DeviceError::with_message(DeviceErrorKind::Unhandled, err.to_string()),
    }
}

fn empty_options<'a>() -> HashMap<&'a str, &'a Value<'a>> {
    HashMap::new()
}

/// A connected block device (spec.md §3.1), addressed by its UDisks2
/// object path.
pub struct BlockBackend {
    connection: zbus::Connection,
    object_path: zbus::zvariant::OwnedObjectPath,
}

impl BlockBackend {
    pub fn new(connection: zbus::Connection, object_path: zbus::zvariant::OwnedObjectPath) -> Self {
        Self { connection, object_path }
    }

    async fn block_proxy(&self) -> zbus::Result<BlockProxy<'_>> {
        BlockProxy::builder(&self.connection)
            .path(self.object_path.as_ref())?
            .build()
            .await
    }

    async fn fs_proxy(&self) -> zbus::Result<FilesystemProxy<'_>> {
        FilesystemProxy::builder(&self.connection)
            .path(self.object_path.as_ref())?
            .build()
            .await
    }

    async fn drive_proxy_for(&self, drive_path: zbus::zvariant::OwnedObjectPath) -> zbus::Result<DriveProxy<'_>> {
        DriveProxy::builder(&self.connection).path(drive_path)?.build().await
    }

    async fn encrypted_proxy(&self) -> zbus::Result<EncryptedProxy<'_>> {
        EncryptedProxy::builder(&self.connection)
            .path(self.object_path.as_ref())?
            .build()
            .await
    }
}

impl BlockDeviceOps for BlockBackend {
    fn mount(&self, options: &MountOptions) -> Result<String, DeviceError> {
        block_on(
            async {
                let proxy = self.fs_proxy().await.map_err(map_zbus_error)?;
                let zbus_options: HashMap<&str, &Value<'_>> = HashMap::new();
                proxy.mount(zbus_options).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn unmount(&self, options: &MountOptions) -> Result<(), DeviceError> {
        let force = Value::new(options.force);
        block_on(
            async {
                let proxy = self.fs_proxy().await.map_err(map_zbus_error)?;
                let mut zbus_options = empty_options();
                zbus_options.insert("force", &force);
                proxy.unmount(zbus_options).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn eject(&self, options: &MountOptions) -> Result<(), DeviceError> {
        block_on(
            async {
                let block = self.block_proxy().await.map_err(map_zbus_error)?;
                let drive_path = block.drive().await.map_err(map_zbus_error)?;
                let drive = self.drive_proxy_for(drive_path).await.map_err(map_zbus_error)?;
                drive.eject(empty_options()).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn power_off(&self, options: &MountOptions) -> Result<(), DeviceError> {
        block_on(
            async {
                let block = self.block_proxy().await.map_err(map_zbus_error)?;
                let drive_path = block.drive().await.map_err(map_zbus_error)?;
                let drive = self.drive_proxy_for(drive_path).await.map_err(map_zbus_error)?;
                drive.power_off(empty_options()).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn rename(&self, label: &str, options: &MountOptions) -> Result<(), DeviceError> {
        block_on(
            async {
                let proxy = self.fs_proxy().await.map_err(map_zbus_error)?;
                proxy.set_label(label, empty_options()).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn lock(&self, options: &MountOptions) -> Result<(), DeviceError> {
        block_on(
            async {
                let proxy = self.encrypted_proxy().await.map_err(map_zbus_error)?;
                proxy.lock(empty_options()).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn unlock(&self, passphrase: &str, options: &MountOptions) -> Result<String, DeviceError> {
        block_on(
            async {
                let proxy = self.encrypted_proxy().await.map_err(map_zbus_error)?;
                let cleartext = proxy
                    .unlock(passphrase, empty_options())
                    .await
                    .map_err(map_zbus_error)?;
                Ok(cleartext.to_string())
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }

    fn rescan(&self, options: &MountOptions) -> Result<(), DeviceError> {
        block_on(
            async {
                let proxy = self.block_proxy().await.map_err(map_zbus_error)?;
                proxy.rescan(empty_options()).await.map_err(map_zbus_error)
            },
            options.deadline,
            options.cancellable.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_maps_to_io_band() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "broken pipe");
        let err = map_zbus_error(zbus::Error::InputOutput(io_err.into()));
        assert_eq!(err.code, DeviceErrorKind::IoFailed as u16);
    }
}
