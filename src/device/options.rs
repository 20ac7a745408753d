//! Mount option closed enumeration (spec.md §3.4).

use std::time::Duration;

use tokio_util_cancel::CancellationToken;

/// Interactive-credential upcalls a caller supplies for a mount that may
/// need a password (gvfs `MountOperation`-equivalent, spec.md §4.1/§4.3).
pub trait MountOperationHandler: Send + Sync {
    /// `ask-password`: returns `(user, domain, password, anonymous)` or
    /// `None` if the user cancelled.
    fn ask_password(
        &self,
        message: &str,
        default_user: &str,
        default_domain: &str,
    ) -> Option<(String, String, String, bool)>;

    /// `ask-question`: returns the chosen index, or `None` if aborted.
    fn ask_question(&self, message: &str, choices: &[String]) -> Option<usize>;
}

/// Options accepted by mount/unmount/eject/... (spec.md §3.4).
#[derive(Clone, Default)]
pub struct MountOptions {
    pub cancellable: Option<CancellationToken>,
    pub operation: Option<std::sync::Arc<dyn MountOperationHandler>>,
    pub force: bool,
    /// Overrides [`crate::config::DEFAULT_MOUNT_DEADLINE`] for the
    /// async-to-sync adapter (spec.md §4.1).
    pub deadline: Option<Duration>,
}

impl std::fmt::Debug for MountOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountOptions")
            .field("cancellable", &self.cancellable.is_some())
            .field("operation", &self.operation.is_some())
            .field("force", &self.force)
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// `save_passwd` choice returned from the credential prompt (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePasswordMode {
    Never,
    Session,
    Permanent,
}

/// Extra inputs for a network mount (spec.md §3.4).
#[derive(Debug, Clone, Default)]
pub struct NetworkMountCredentials {
    pub user: String,
    pub domain: String,
    /// Base64-encoded password, per spec.md §3.4.
    pub password_base64: String,
    pub timeout_seconds: u32,
    pub filesystem_type: String,
}

/// Result bag from a network mount (spec.md §3.4).
#[derive(Debug, Clone)]
pub struct NetworkMountResult {
    pub mount_point: String,
    pub errno: i32,
    pub err_msg: String,
    pub result: bool,
}

/// Minimal stand-in for `tokio_util::sync::CancellationToken` (spec.md §5
/// "Cancellation"): a cloneable flag plus a notifier so a blocked waiter
/// can be woken the instant `cancel()` is called.
pub mod tokio_util_cancel {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Clone)]
    pub struct CancellationToken {
        flag: Arc<AtomicBool>,
        notify: Arc<Notify>,
    }

    impl Default for CancellationToken {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CancellationToken {
        pub fn new() -> Self {
            Self { flag: Arc::new(AtomicBool::new(false)), notify: Arc::new(Notify::new()) }
        }

        pub fn cancel(&self) {
            self.flag.store(true, Ordering::SeqCst);
            self.notify.notify_waiters();
        }

        pub fn is_cancelled(&self) -> bool {
            self.flag.load(Ordering::SeqCst)
        }

        pub async fn cancelled(&self) {
            if self.is_cancelled() {
                return;
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_starts_uncancelled() {
        let token = tokio_util_cancel::CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
