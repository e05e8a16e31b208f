//! Platform directory resolution.
//!
//! All OS-specific path conventions are isolated here behind
//! [`PlatformDirs`].

use std::path::{Path, PathBuf};

/// Errors that can occur during platform operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
}

/// OS-specific directories of the editor.
///
/// XDG on Linux, Known Folders on Windows, Library on macOS.
pub struct PlatformDirs {
    /// `config.ron`.
    pub config_dir: PathBuf,
    /// Log files.
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "rustmap";

impl PlatformDirs {
    /// Resolve directories without creating them. `config_override` replaces
    /// the OS configuration directory when given.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory and no override was given.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, PlatformError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => rustmap_config::default_config_dir().ok_or(PlatformError::NoConfigDir)?,
        };
        let log_dir = dirs::data_local_dir()
            .map(|base| base.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| config_dir.join("logs"));
        Ok(Self {
            config_dir,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve(Some(tmp.path())).unwrap();
        assert_eq!(dirs.config_dir, tmp.path());
        assert!(dirs.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_resolve_does_not_create() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("not-yet");
        let dirs = PlatformDirs::resolve(Some(&missing)).unwrap();
        assert_eq!(dirs.config_dir, missing);
        assert!(!missing.exists());
    }
}
