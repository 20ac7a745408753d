//! Device-facing error taxonomy (spec bands in §7).
//!
//! Numeric bands let a transport error be mapped into [`DeviceError`] by
//! domain alone: backend (udisks-like) errors start at 0, I/O (gio-like)
//! errors at 200, D-Bus errors at 400, our own user-level errors at 800,
//! with 1000 reserved for anything that does not map cleanly.

use std::fmt;

/// Numeric band starts, see spec.md §7.
pub mod band {
    pub const BACKEND: u16 = 0;
    pub const IO: u16 = 200;
    pub const DBUS: u16 = 400;
    pub const USER: u16 = 800;
    pub const UNHANDLED: u16 = 1000;
}

/// A sticky, transferable device error.
///
/// `code` is the numeric band value (spec.md §7); `message` carries the
/// backend's own text when one was available. Two errors compare equal
/// when their codes match, regardless of message text, since callers
/// branch on the code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind} (code {code}){}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct DeviceError {
    pub code: u16,
    pub kind: DeviceErrorKind,
    pub message: Option<String>,
}

impl PartialEq for DeviceError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}
impl Eq for DeviceError {}

impl DeviceError {
    pub fn new(kind: DeviceErrorKind) -> Self {
        let code = kind.code();
        Self { code, kind, message: None }
    }

    pub fn with_message(kind: DeviceErrorKind, message: impl Into<String>) -> Self {
        let code = kind.code();
        Self { code, kind, message: Some(message.into()) }
    }

    pub fn is_user_band(&self) -> bool {
        self.code >= band::USER && self.code < band::UNHANDLED
    }
}

/// Flat enum of every error kind spec.md §7 names, grouped by band in
/// declaration order so `as u16` recovers the contractual numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DeviceErrorKind {
    // --- backend (udisks-like), band start 0 ---
    BackendFailed = band::BACKEND,
    BackendCancelled,
    BackendAlreadyCancelled,
    BackendNotAuthorized,
    BackendNotAuthorizedCanObtain,
    BackendNotAuthorizedDismissed,
    BackendAlreadyMounted,
    BackendNotMounted,
    BackendOptionNotPermitted,
    BackendMountedByOtherUser,
    BackendAlreadyUnmounting,
    BackendNotSupported,
    BackendTimedOut,
    BackendWouldWakeup,
    BackendDeviceBusy,
    BackendScsiDaemonTransportFailed,
    BackendScsiHostNotFound,
    BackendScsiLoginFailed,
    BackendScsiLoginAuthFailed,
    BackendScsiLogoutFailed,
    BackendScsiNoFirmware,
    BackendScsiNotConnected,
    BackendScsiTransportFailed,
    BackendJobInProgress,

    // --- I/O (gio-like), band start 200 ---
    IoFailed = band::IO,
    IoNotFound,
    IoExists,
    IoIsDirectory,
    IoNotDirectory,
    IoNotEmpty,
    IoNotMountableFile,
    IoInvalidArgument,
    IoPermissionDenied,
    IoNotSupported,
    IoNotMounted,
    IoAlreadyMounted,
    IoClosed,
    IoCancelled,
    IoTimedOut,
    IoBusy,
    IoHostNotFound,
    IoHostUnreachable,
    IoNetworkUnreachable,
    IoConnectionRefused,

    // --- D-Bus, band start 400 ---
    DBusNoReply = band::DBUS,
    DBusInvalidArgs,
    DBusAccessDenied,
    DBusAuthFailed,
    DBusNoNetwork,
    DBusServiceUnknown,
    DBusUnknownObject,
    DBusUnknownInterface,
    DBusUnknownProperty,
    DBusTimeout,

    // --- user-level, band start 800 ---
    UserNotMountable = band::USER,
    UserNotEjectable,
    UserNoDriver,
    UserNotEncryptable,
    UserNoPartition,
    UserNoBlock,
    UserNetworkWrongPasswd,
    UserNetworkAnonymousNotAllowed,
    UserCancelled,
    UserTimedOut,
    UserAlreadyMounted,
    UserNotMounted,
    UserNotPoweroffable,
    UserAuthenticationFailed,
    UserFailed,

    // --- catch-all, 1000 ---
    Unhandled = band::UNHANDLED,
}

impl DeviceErrorKind {
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for DeviceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Maps a D-Bus error name (the `org.freedesktop.DBus.Error.*` / UDisks2 /
/// Gio-equivalent string returned by the backend) into a [`DeviceErrorKind`].
/// Anything not recognized maps to [`DeviceErrorKind::Unhandled`] per
/// spec.md §7 ("unknown errors map to UnhandledError").
pub fn from_backend_error_name(name: &str) -> DeviceErrorKind {
    use DeviceErrorKind::*;
    match name {
        "org.freedesktop.UDisks2.Error.Failed" => BackendFailed,
        "org.freedesktop.UDisks2.Error.Cancelled" => BackendCancelled,
        "org.freedesktop.UDisks2.Error.AlreadyCancelled" => BackendAlreadyCancelled,
        "org.freedesktop.UDisks2.Error.NotAuthorized" => BackendNotAuthorized,
        "org.freedesktop.UDisks2.Error.NotAuthorizedCanObtain" => BackendNotAuthorizedCanObtain,
        "org.freedesktop.UDisks2.Error.NotAuthorizedDismissed" => BackendNotAuthorizedDismissed,
        "org.freedesktop.UDisks2.Error.AlreadyMounted" => BackendAlreadyMounted,
        "org.freedesktop.UDisks2.Error.NotMounted" => BackendNotMounted,
        "org.freedesktop.UDisks2.Error.OptionNotPermitted" => BackendOptionNotPermitted,
        "org.freedesktop.UDisks2.Error.MountedByOtherUser" => BackendMountedByOtherUser,
        "org.freedesktop.UDisks2.Error.AlreadyUnmounting" => BackendAlreadyUnmounting,
        "org.freedesktop.UDisks2.Error.NotSupported" => BackendNotSupported,
        "org.freedesktop.UDisks2.Error.Timedout" => BackendTimedOut,
        "org.freedesktop.UDisks2.Error.WouldWakeup" => BackendWouldWakeup,
        "org.freedesktop.UDisks2.Error.DeviceBusy" => BackendDeviceBusy,
        s if s.starts_with("org.freedesktop.UDisks2.Error.Scsi") => BackendScsiTransportFailed,

        "g-io-error-quark.Failed" | "org.gtk.GDBus.UnmappedGError.Failed" => IoFailed,
        "org.freedesktop.IOError.NotFound" => IoNotFound,
        "org.freedesktop.IOError.Exists" => IoExists,
        "org.freedesktop.IOError.IsDirectory" => IoIsDirectory,
        "org.freedesktop.IOError.NotDirectory" => IoNotDirectory,
        "org.freedesktop.IOError.NotEmpty" => IoNotEmpty,
        "org.freedesktop.IOError.NotMountableFile" => IoNotMountableFile,
        "org.freedesktop.IOError.InvalidArgument" => IoInvalidArgument,
        "org.freedesktop.IOError.PermissionDenied" => IoPermissionDenied,
        "org.freedesktop.IOError.NotSupported" => IoNotSupported,
        "org.freedesktop.IOError.NotMounted" => IoNotMounted,
        "org.freedesktop.IOError.AlreadyMounted" => IoAlreadyMounted,
        "org.freedesktop.IOError.Closed" => IoClosed,
        "org.freedesktop.IOError.Cancelled" => IoCancelled,
        "org.freedesktop.IOError.TimedOut" => IoTimedOut,
        "org.freedesktop.IOError.Busy" => IoBusy,
        "org.freedesktop.IOError.HostNotFound" => IoHostNotFound,
        "org.freedesktop.IOError.HostUnreachable" => IoHostUnreachable,
        "org.freedesktop.IOError.NetworkUnreachable" => IoNetworkUnreachable,
        "org.freedesktop.IOError.ConnectionRefused" => IoConnectionRefused,

        "org.freedesktop.DBus.Error.NoReply" => DBusNoReply,
        "org.freedesktop.DBus.Error.InvalidArgs" => DBusInvalidArgs,
        "org.freedesktop.DBus.Error.AccessDenied" => DBusAccessDenied,
        "org.freedesktop.DBus.Error.AuthFailed" => DBusAuthFailed,
        "org.freedesktop.DBus.Error.NoNetwork" => DBusNoNetwork,
        "org.freedesktop.DBus.Error.ServiceUnknown" => DBusServiceUnknown,
        "org.freedesktop.DBus.Error.UnknownObject" => DBusUnknownObject,
        "org.freedesktop.DBus.Error.UnknownInterface" => DBusUnknownInterface,
        "org.freedesktop.DBus.Error.UnknownProperty" => DBusUnknownProperty,
        "org.freedesktop.DBus.Error.Timeout" => DBusTimeout,

        _ => Unhandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_error_is_unhandled() {
        assert_eq!(from_backend_error_name("com.example.Bogus"), DeviceErrorKind::Unhandled);
    }

    #[test]
    fn bands_are_contractual() {
        assert_eq!(DeviceErrorKind::BackendFailed.code(), 0);
        assert_eq!(DeviceErrorKind::IoFailed.code(), 200);
        assert_eq!(DeviceErrorKind::DBusNoReply.code(), 400);
        assert_eq!(DeviceErrorKind::UserNotMountable.code(), 800);
        assert_eq!(DeviceErrorKind::Unhandled.code(), 1000);
    }

    #[test]
    fn equality_ignores_message() {
        let a = DeviceError::new(DeviceErrorKind::UserNotMounted);
        let b = DeviceError::with_message(DeviceErrorKind::UserNotMounted, "already gone");
        assert_eq!(a, b);
    }
}
