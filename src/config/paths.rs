//! Path resolution for todoline configuration and data files.
//!
//! All todoline data is stored in `~/.todoline/`:
//! - `config.yaml` - Main configuration file
//! - `todoline.db` - SQLite database holding tasks and tags
//! - `todoline.log` - Diagnostic log

use std::path::PathBuf;

use crate::error::TodoError;

/// Paths to todoline configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.todoline/`
    pub root: PathBuf,
    /// Config file: `~/.todoline/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.todoline/todoline.db`
    pub database: PathBuf,
    /// Log file: `~/.todoline/todoline.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TodoError> {
        let home = std::env::var("HOME")
            .map_err(|_| TodoError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".todoline")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("todoline.db"),
            log_file: root.join("todoline.log"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TodoError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TodoError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        // Fall back to the current directory if home cannot be determined
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".todoline")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-todoline");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("todoline.db"));
        assert_eq!(paths.log_file, root.join("todoline.log"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
