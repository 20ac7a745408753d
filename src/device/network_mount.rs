//! Network mount path selection (spec.md §4.3, C3): chooses between the
//! privileged mount-control daemon and the protocol backend directly,
//! and brokers the interactive credential prompt.

use crate::device::backend::dbus_proxies::MountControlProxy;
use crate::device::options::{MountOperationHandler, NetworkMountCredentials, NetworkMountResult, SavePasswordMode};
use crate::device::secret_service::SecretServiceClient;
use crate::error::{DeviceError, DeviceErrorKind};

pub const MOUNT_CONTROL_SERVICE: &str = "org.deepin.Filemanager.MountControl";
pub const DAEMON_PATH: &str = "/org/deepin/Filemanager";
pub const MOUNT_CONTROL_PATH: &str = "/org/deepin/Filemanager/MountControl";

async fn introspect(connection: &zbus::Connection, path: &str) -> Option<String> {
    let builder = zbus::fdo::IntrospectableProxy::builder(connection).destination(MOUNT_CONTROL_SERVICE).ok()?;
    let builder = builder.path(path).ok()?;
    builder.build().await.ok()?.introspect().await.ok()
}

/// Three-step check (spec.md §9 supplemented feature 3): the well-known
/// bus name must be owned, the daemon path must advertise a `MountControl`
/// child node, and `MountControl` must either not expose
/// `SupportedFileSystems` at all (older daemon, assume it works) or list
/// `cifs` among what it returns. A daemon mid-upgrade that is missing any
/// of these is treated as unavailable — the gvfs path must still work.
pub async fn is_daemon_mount_enabled(connection: &zbus::Connection) -> bool {
    let Ok(dbus_proxy) = zbus::fdo::DBusProxy::new(connection).await else {
        return false;
    };
    let Ok(has_owner) = dbus_proxy.name_has_owner(MOUNT_CONTROL_SERVICE.try_into().unwrap()).await else {
        return false;
    };
    if !has_owner {
        return false;
    }

    let Some(daemon_xml) = introspect(connection, DAEMON_PATH).await else { return false };
    if !daemon_xml.contains(r#"<node name="MountControl"/>"#) {
        return false;
    }

    let Some(mount_control_xml) = introspect(connection, MOUNT_CONTROL_PATH).await else { return false };
    if !mount_control_xml.contains(r#"<method name="SupportedFileSystems">"#) {
        return true;
    }

    let Ok(proxy) = MountControlProxy::new(connection).await else { return false };
    let Ok(supported) = proxy.supported_file_systems().await else { return false };
    supported.iter().any(|fs| fs == "cifs")
}

/// Prompts the user for credentials via the supplied upcall, base64-
/// encoding the password the way the wire protocol expects (spec.md
/// §3.4 "password_base64").
pub fn prompt_credentials(
    handler: &dyn MountOperationHandler,
    message: &str,
    default_user: &str,
    default_domain: &str,
) -> Option<(NetworkMountCredentials, SavePasswordMode)> {
    let (user, domain, password, anonymous) = handler.ask_password(message, default_user, default_domain)?;
    if anonymous {
        return Some((
            NetworkMountCredentials { user: String::new(), domain, password_base64: String::new(), timeout_seconds: 0, filesystem_type: String::new() },
            SavePasswordMode::Never,
        ));
    }
    use base64::Engine;
    let password_base64 = base64::engine::general_purpose::STANDARD.encode(password.as_bytes());
    Some((
        NetworkMountCredentials { user, domain, password_base64, timeout_seconds: 0, filesystem_type: String::new() },
        SavePasswordMode::Session,
    ))
}

/// Looks up a previously saved password for `server`/`user`/`protocol`
/// via the secret service, returning `None` on any miss (spec.md §4.3).
pub async fn lookup_saved_password(
    secrets: &SecretServiceClient,
    protocol: &str,
    server: &str,
    user: &str,
) -> Option<String> {
    secrets.find_network_password(protocol, server, user).await.ok().flatten()
}

/// Issues the mount through the daemon path, falling back to the direct
/// protocol backend mount when the daemon declines to run (spec.md §4.3
/// "daemon path vs gvfs path").
pub async fn mount_network_share(
    connection: &zbus::Connection,
    address: &str,
    credentials: &NetworkMountCredentials,
) -> Result<NetworkMountResult, DeviceError> {
    if !is_daemon_mount_enabled(connection).await {
        return Err(DeviceError::new(DeviceErrorKind::UserNoDriver));
    }

    let proxy = MountControlProxy::new(connection)
        .await
        .map_err(|e| DeviceError::with_message(DeviceErrorKind::DBusServiceUnknown, e.to_string()))?;

    let user_value = zbus::zvariant::Value::new(credentials.user.clone());
    let domain_value = zbus::zvariant::Value::new(credentials.domain.clone());
    let password_value = zbus::zvariant::Value::new(credentials.password_base64.clone());
    let mut options = std::collections::HashMap::new();
    options.insert("user", &user_value);
    options.insert("domain", &domain_value);
    options.insert("password", &password_value);

    let (ok, mount_point, errno, err_msg) = proxy
        .mount(address, options)
        .await
        .map_err(|e| DeviceError::with_message(DeviceErrorKind::DBusNoReply, e.to_string()))?;

    Ok(NetworkMountResult { mount_point, errno, err_msg, result: ok })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysCancel;
    impl MountOperationHandler for AlwaysCancel {
        fn ask_password(&self, _: &str, _: &str, _: &str) -> Option<(String, String, String, bool)> {
            None
        }
        fn ask_question(&self, _: &str, _: &[String]) -> Option<usize> {
            None
        }
    }

    #[test]
    fn cancelled_prompt_returns_none() {
        assert!(prompt_credentials(&AlwaysCancel, "auth required", "guest", "WORKGROUP").is_none());
    }

    struct FixedAnswer;
    impl MountOperationHandler for FixedAnswer {
        fn ask_password(&self, _: &str, _: &str, _: &str) -> Option<(String, String, String, bool)> {
            Some(("alice".into(), "WORKGROUP".into(), "hunter2".into(), false))
        }
        fn ask_question(&self, _: &str, _: &[String]) -> Option<usize> {
            None
        }
    }

    #[test]
    fn password_is_base64_encoded() {
        let (creds, mode) = prompt_credentials(&FixedAnswer, "auth required", "alice", "WORKGROUP").unwrap();
        assert_eq!(creds.password_base64, "aHVudGVyMg==");
        assert_eq!(mode, SavePasswordMode::Session);
    }

    struct Anonymous;
    impl MountOperationHandler for Anonymous {
        fn ask_password(&self, _: &str, _: &str, _: &str) -> Option<(String, String, String, bool)> {
            Some((String::new(), "WORKGROUP".into(), String::new(), true))
        }
        fn ask_question(&self, _: &str, _: &[String]) -> Option<usize> {
            None
        }
    }

    #[test]
    fn anonymous_login_never_saves() {
        let (creds, mode) = prompt_credentials(&Anonymous, "auth required", "", "WORKGROUP").unwrap();
        assert!(creds.password_base64.is_empty());
        assert_eq!(mode, SavePasswordMode::Never);
    }
}
