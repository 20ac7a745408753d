//! Device identity (spec.md §3.1).

use std::fmt;

/// Which family a device belongs to. `Net` is reserved for the tagged
/// event stream (spec.md §3.1 "Kind tag") and is synonymous with
/// `Protocol` for every device actually backed by the protocol monitor;
/// kept distinct so callers can special-case network shares without a
/// string comparison on the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Block,
    Protocol,
    Net,
}

/// Opaque device identity: the backend object path for block devices,
/// the URI for protocol devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn from_object_path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A block device id is a D-Bus object path; protocol ids are URIs
    /// with a `scheme://`. Loop/native devices report object paths that
    /// never contain `://`.
    pub fn is_block(&self) -> bool {
        !self.0.contains("://")
    }

    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_has_no_scheme() {
        let id = DeviceId::from_object_path("/org/freedesktop/UDisks2/block_devices/sda1");
        assert!(id.is_block());
        assert_eq!(id.scheme(), None);
    }

    #[test]
    fn protocol_id_has_scheme() {
        let id = DeviceId::from_uri("smb://host/share");
        assert!(!id.is_block());
        assert_eq!(id.scheme(), Some("smb"));
    }
}
