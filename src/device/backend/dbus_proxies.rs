//! Hand-written zbus proxies for the system/session bus interfaces this
//! crate consumes (spec.md §6). These are the typed wrapper spec.md asks
//! C1 to provide — we do not pull in a pre-built `udisks2`/`gio` crate,
//! we *are* one.

use zbus::zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};
use zbus::proxy;

/// `org.freedesktop.DBus.ObjectManager` on the UDisks2-equivalent service,
/// used by the block monitor to enumerate and watch block/drive objects
/// (spec.md §6).
#[proxy(
    interface = "org.freedesktop.DBus.ObjectManager",
    default_service = "org.freedesktop.UDisks2",
    default_path = "/org/freedesktop/UDisks2"
)]
pub trait ObjectManager {
    #[zbus(signal)]
    fn interfaces_added(
        &self,
        object_path: ObjectPath<'_>,
        interfaces_and_properties: std::collections::HashMap<String, std::collections::HashMap<String, OwnedValue>>,
    );

    #[zbus(signal)]
    fn interfaces_removed(&self, object_path: ObjectPath<'_>, interfaces: Vec<String>);

    fn get_managed_objects(
        &self,
    ) -> zbus::Result<
        std::collections::HashMap<
            OwnedObjectPath,
            std::collections::HashMap<String, std::collections::HashMap<String, OwnedValue>>,
        >,
    >;
}

/// `org.freedesktop.UDisks2.Block`.
#[proxy(
    interface = "org.freedesktop.UDisks2.Block",
    default_service = "org.freedesktop.UDisks2"
)]
pub trait Block {
    #[zbus(property)]
    fn device(&self) -> zbus::Result<Vec<u8>>;
    #[zbus(property, name = "Drive")]
    fn drive(&self) -> zbus::Result<OwnedObjectPath>;
    #[zbus(property, name = "IdLabel")]
    fn id_label(&self) -> zbus::Result<String>;
    #[zbus(property, name = "IdType")]
    fn id_type(&self) -> zbus::Result<String>;
    #[zbus(property, name = "IdUUID")]
    fn id_uuid(&self) -> zbus::Result<String>;
    #[zbus(property)]
    fn size(&self) -> zbus::Result<u64>;
    #[zbus(property)]
    fn read_only(&self) -> zbus::Result<bool>;

    fn rescan(&self, options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>) -> zbus::Result<()>;
}

/// `org.freedesktop.UDisks2.Filesystem`.
#[proxy(
    interface = "org.freedesktop.UDisks2.Filesystem",
    default_service = "org.freedesktop.UDisks2"
)]
pub trait Filesystem {
    #[zbus(property, name = "MountPoints")]
    fn mount_points(&self) -> zbus::Result<Vec<Vec<u8>>>;

    fn mount(
        &self,
        options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>,
    ) -> zbus::Result<String>;

    fn unmount(&self, options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>) -> zbus::Result<()>;

    #[zbus(name = "SetLabel")]
    fn set_label(&self, label: &str, options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>) -> zbus::Result<()>;
}

/// `org.freedesktop.UDisks2.Drive`.
#[proxy(
    interface = "org.freedesktop.UDisks2.Drive",
    default_service = "org.freedesktop.UDisks2"
)]
pub trait Drive {
    #[zbus(property)]
    fn ejectable(&self) -> zbus::Result<bool>;
    #[zbus(property, name = "CanPowerOff")]
    fn can_power_off(&self) -> zbus::Result<bool>;
    #[zbus(property)]
    fn optical(&self) -> zbus::Result<bool>;
    #[zbus(property, name = "OpticalBlank")]
    fn optical_blank(&self) -> zbus::Result<bool>;
    #[zbus(property)]
    fn media(&self) -> zbus::Result<String>;

    fn eject(&self, options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>) -> zbus::Result<()>;
    fn power_off(&self, options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>) -> zbus::Result<()>;
}

/// `org.freedesktop.UDisks2.Encrypted`.
#[proxy(
    interface = "org.freedesktop.UDisks2.Encrypted",
    default_service = "org.freedesktop.UDisks2"
)]
pub trait Encrypted {
    fn unlock(
        &self,
        passphrase: &str,
        options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>,
    ) -> zbus::Result<OwnedObjectPath>;

    fn lock(&self, options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>) -> zbus::Result<()>;
}

/// Privileged network-mount daemon (spec.md §6, §4.3).
#[proxy(
    interface = "org.deepin.Filemanager.MountControl",
    default_service = "org.deepin.Filemanager.MountControl",
    default_path = "/org/deepin/Filemanager/MountControl"
)]
pub trait MountControl {
    fn mount(
        &self,
        address: &str,
        options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>,
    ) -> zbus::Result<(bool, String, i32, String)>;

    fn unmount(
        &self,
        mount_point: &str,
        options: std::collections::HashMap<&str, &zbus::zvariant::Value<'_>>,
    ) -> zbus::Result<(bool, i32, String)>;

    fn supported_file_systems(&self) -> zbus::Result<Vec<String>>;
}

/// Secret-service collection/item interfaces (spec.md §6), scoped to the
/// `org.gnome.keyring.NetworkPassword` schema this crate uses.
#[proxy(
    interface = "org.freedesktop.Secret.Service",
    default_service = "org.freedesktop.secrets",
    default_path = "/org/freedesktop/secrets"
)]
pub trait SecretService {
    #[allow(clippy::type_complexity)]
    fn search_items(
        &self,
        attributes: std::collections::HashMap<&str, &str>,
    ) -> zbus::Result<(Vec<OwnedObjectPath>, Vec<OwnedObjectPath>)>;

    fn unlock(&self, objects: &[ObjectPath<'_>]) -> zbus::Result<(Vec<OwnedObjectPath>, OwnedObjectPath)>;
}

#[proxy(interface = "org.freedesktop.Secret.Item", default_service = "org.freedesktop.secrets")]
pub trait SecretItem {
    fn get_secret(&self, session: ObjectPath<'_>) -> zbus::Result<(OwnedObjectPath, Vec<u8>, Vec<u8>, String)>;
}
