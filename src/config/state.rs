// Application state module
// Read-only state shared by every connection task

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical root directory; every served path must stay below it
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the configured root against the launch directory and build the state.
    ///
    /// Fails when the root does not exist or is not a directory.
    pub fn new(config: &Config) -> io::Result<Self> {
        Self::with_root(config, Path::new(&config.static_files.root))
    }

    /// Build state for an explicit root directory
    pub fn with_root(config: &Config, root: &Path) -> io::Result<Self> {
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        Ok(Self {
            config: config.clone(),
            root,
        })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();

        let dotted = dir.path().join("dist").join(".").join("..").join("dist");
        let state = AppState::with_root(&Config::default(), &dotted).unwrap();
        assert_eq!(state.root, dir.path().join("dist").canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::with_root(&Config::default(), &dir.path().join("missing"));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        let err = AppState::with_root(&Config::default(), &file).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
