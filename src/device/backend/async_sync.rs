//! Bridges the async D-Bus backend to the synchronous facade callers get
//! (spec.md §4.1 "async-to-sync adapter"). The original helper parked a
//! nested glib event loop until a signal fired; we run the future on the
//! crate's tokio runtime and race it against a deadline and an optional
//! cancellation token instead.

use std::time::Duration;

use crate::config::DEFAULT_MOUNT_DEADLINE;
use crate::device::options::tokio_util_cancel::CancellationToken;
use crate::error::{DeviceError, DeviceErrorKind};

/// Drives `fut` to completion on a dedicated current-thread runtime,
/// bounded by `deadline` (defaulting to [`DEFAULT_MOUNT_DEADLINE`]) and
/// abortable through `cancellable`.
///
/// Building a fresh runtime per call mirrors the original's one
/// nested-loop-per-call shape; callers that need to issue many of these
/// back to back should prefer the async API directly instead.
pub fn block_on<F, T>(fut: F, deadline: Option<Duration>, cancellable: Option<&CancellationToken>) -> Result<T, DeviceError>
where
    F: std::future::Future<Output = Result<T, DeviceError>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| DeviceError::with_message(DeviceErrorKind::Unhandled, e.to_string()))?;

    runtime.block_on(async move {
        let deadline = deadline.unwrap_or(DEFAULT_MOUNT_DEADLINE);
        let timed = tokio::time::timeout(deadline, fut);

        match cancellable {
            None => timed
                .await
                .map_err(|_| DeviceError::new(DeviceErrorKind::DBusTimeout))?,
            Some(token) => {
                tokio::select! {
                    result = timed => result.map_err(|_| DeviceError::new(DeviceErrorKind::DBusTimeout))?,
                    _ = token.cancelled() => Err(DeviceError::new(DeviceErrorKind::UserCancelled)),
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_before_deadline() {
        let result = block_on(
            async { Ok::<_, DeviceError>(42) },
            Some(Duration::from_secs(1)),
            None,
        );
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn times_out_when_future_never_resolves() {
        let result: Result<(), DeviceError> = block_on(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Some(Duration::from_millis(10)),
            None,
        );
        assert_eq!(result.unwrap_err().code, DeviceErrorKind::DBusTimeout as u16);
    }

    #[test]
    fn cancellation_wins_over_pending_future() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), DeviceError> = block_on(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Some(Duration::from_secs(5)),
            Some(&token),
        );
        assert_eq!(result.unwrap_err().code, DeviceErrorKind::UserCancelled as u16);
    }
}
