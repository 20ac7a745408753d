//! Filesystem locations and timing defaults the toolkit needs that
//! spec.md names explicitly but does not route through a config file
//! (config-file parsing is out of scope, spec.md §1).

use std::path::PathBuf;
use std::time::Duration;

/// Default deadline for the async-to-sync mount/unmount adapter (spec.md §4.1).
pub const DEFAULT_MOUNT_DEADLINE: Duration = Duration::from_secs(25);

/// Delay before re-querying the backend after a `FileSystemMountPoint`
/// change so its own property cache is settled (spec.md §4.2).
pub const PROPERTY_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Search result batch-flush interval (spec.md §4.5.6).
pub const SEARCH_BATCH_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Minimum UTF-8 byte length for a content search keyword (spec.md §4.5.3).
pub const MIN_CONTENT_SEARCH_KEYWORD_LENGTH: usize = 2;

/// Characters escaped before building a query-language term (spec.md §4.5.2).
pub const QUERY_SPECIAL_CHARS: &str = "+-&&||!(){}[]^\"~*?:\\/";

/// Directory the realtime-search "mounted-by-other-user" / smbmounts regex
/// checks against, and the root the filename index lives under.
pub fn filename_index_dir(uid: u32) -> PathBuf {
    PathBuf::from(format!("/run/user/{uid}/deepin-anything-server"))
}

/// Content index directory, rooted at `$XDG_CONFIG_HOME` (spec.md §6).
pub fn content_index_dir() -> PathBuf {
    xdg::BaseDirectories::new()
        .ok()
        .map(|dirs| dirs.get_config_home())
        .unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_default()).join(".config"))
        .join("deepin/dde-file-manager/index")
}

/// Default indexed/searched root: the current user's home directory
/// (spec.md §6 "Default indexed roots").
pub fn default_search_root() -> PathBuf {
    dirs_home()
}

fn dirs_home() -> PathBuf {
    std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_index_dir_is_per_uid() {
        assert_eq!(
            filename_index_dir(1000),
            PathBuf::from("/run/user/1000/deepin-anything-server")
        );
    }
}
