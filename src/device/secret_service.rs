//! Client for the session `org.freedesktop.secrets` service, scoped to
//! the network-password schema this crate consumes (spec.md §4.3, §6).

use std::collections::HashMap;

use crate::device::backend::dbus_proxies::{SecretItemProxy, SecretServiceProxy};

const NETWORK_PASSWORD_SCHEMA: &str = "org.gnome.keyring.NetworkPassword";

/// Thin wrapper that looks up and stores network-share passwords in the
/// user's default secret collection.
pub struct SecretServiceClient {
    connection: zbus::Connection,
}

impl SecretServiceClient {
    pub fn new(connection: zbus::Connection) -> Self {
        Self { connection }
    }

    async fn service_proxy(&self) -> zbus::Result<SecretServiceProxy<'_>> {
        SecretServiceProxy::new(&self.connection).await
    }

    /// Finds a saved password for `protocol://server` under `user`,
    /// unlocking the owning collection if needed. Returns `Ok(None)` when
    /// no matching item exists rather than treating that as an error.
    pub async fn find_network_password(&self, protocol: &str, server: &str, user: &str) -> zbus::Result<Option<String>> {
        let proxy = self.service_proxy().await?;

        let mut attributes = HashMap::new();
        attributes.insert("xdg:schema", NETWORK_PASSWORD_SCHEMA);
        attributes.insert("protocol", protocol);
        attributes.insert("server", server);
        attributes.insert("user", user);

        let (unlocked, locked) = proxy.search_items(attributes).await?;
        let item_path = match unlocked.into_iter().next() {
            Some(path) => path,
            None => {
                if locked.is_empty() {
                    return Ok(None);
                }
                let (_still_locked, _session) = proxy.unlock(&locked.iter().map(|p| p.as_ref()).collect::<Vec<_>>()).await?;
                let Some(path) = locked.into_iter().next() else { return Ok(None) };
                path
            }
        };

        let item = SecretItemProxy::builder(&self.connection).path(item_path)?.build().await?;
        let session = zbus::zvariant::ObjectPath::try_from("/").unwrap();
        let (_session_out, _params, secret_bytes, _content_type) = item.get_secret(session).await?;
        Ok(Some(String::from_utf8_lossy(&secret_bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn schema_name_is_the_gnome_keyring_network_password_schema() {
        assert_eq!(super::NETWORK_PASSWORD_SCHEMA, "org.gnome.keyring.NetworkPassword");
    }
}
