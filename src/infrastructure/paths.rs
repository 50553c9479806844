//! Storage location resolution.

use std::path::{Path, PathBuf};

/// Overrides the data directory when set.
pub const DATA_DIR_ENV: &str = "MODCATALOG_DATA_DIR";

/// Default settings file name inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Returns the directory holding settings and trace files.
///
/// Resolution order: `$MODCATALOG_DATA_DIR`, then
/// `$HOME/.local/share/modcatalog`, then `./.modcatalog`.
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_data_dir(explicit: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    explicit
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| {
            home.filter(|h| !h.as_os_str().is_empty())
                .map(|h| h.join(".local").join("share").join("modcatalog"))
        })
        .unwrap_or_else(|| PathBuf::from(".modcatalog"))
}

/// Resolves the settings file: `configured` if given, else the default under
/// [`data_dir`].
///
/// # Examples
///
/// ```
/// use modcatalog::infrastructure::settings_path;
/// use std::path::Path;
///
/// assert_eq!(settings_path(Some("/tmp/s.json")), Path::new("/tmp/s.json"));
/// assert!(settings_path(None).ends_with("settings.json"));
/// ```
#[must_use]
pub fn settings_path(configured: Option<&str>) -> PathBuf {
    configured.map_or_else(
        || data_dir().join(SETTINGS_FILE_NAME),
        |p| expand_tilde(Path::new(p)),
    )
}

/// Replaces a leading `~` with `$HOME`.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    std::env::var_os("HOME").map_or_else(|| path.to_path_buf(), |home| PathBuf::from(home).join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_data_dir(Some("/srv/catalog".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/srv/catalog"));
    }

    #[test]
    fn falls_back_to_home_then_cwd() {
        assert_eq!(
            resolve_data_dir(None, Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share/modcatalog")
        );
        assert_eq!(resolve_data_dir(Some(PathBuf::new()), None), PathBuf::from(".modcatalog"));
    }

    #[test]
    fn absolute_paths_are_untouched() {
        assert_eq!(expand_tilde(Path::new("/etc/x")), PathBuf::from("/etc/x"));
    }
}
