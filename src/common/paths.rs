//! Project and user configuration paths
//!
//! Project paths (actions directory, UI binary, snapshot) are resolved
//! against the project root. The per-user config file lives in the
//! platform config directory.

use std::path::{Path, PathBuf};

/// Name used for the per-user config directory
const APP_NAME: &str = "ui-conformance";

/// File name of the project-level config file
pub const PROJECT_CONFIG_FILE: &str = "conformance.toml";

/// Get the per-user configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/ui-conformance/`
/// - macOS: `~/Library/Application Support/ui-conformance/`
/// - Windows: `%APPDATA%\ui-conformance\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the project-level configuration file
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(PROJECT_CONFIG_FILE)
}

/// Resolve a configured path against the project root
///
/// Absolute paths are returned unchanged.
pub fn resolve(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

/// Locate the UI binary
///
/// Looks relative to the project root first. When the configured value is a
/// bare program name (no directory part) it is also searched on `PATH`.
pub fn find_ui_binary(root: &Path, configured: &Path) -> Option<PathBuf> {
    let local = resolve(root, configured);
    if local.is_file() {
        return Some(local);
    }

    let bare = configured.components().count() == 1 && !configured.is_absolute();
    if bare {
        return which::which(configured).ok();
    }
    None
}
