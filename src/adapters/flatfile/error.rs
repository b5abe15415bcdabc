//! Errors raised while loading a flat-file store.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to load a store file.
///
/// A missing file is not an error; it loads as an empty store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in store file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file the failure relates to.
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Io { path, .. } | StoreError::Parse { path, .. } => path,
        }
    }

    /// Returns true if the file exists but is not valid JSON.
    pub fn is_parse(&self) -> bool {
        matches!(self, StoreError::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = StoreError::io(
            Path::new("data/users.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("data/users.json"));
        assert!(!err.is_parse());

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::parse(Path::new("data/subscriptions.json"), source);
        assert!(err.is_parse());
        assert_eq!(err.path(), Path::new("data/subscriptions.json"));
        assert!(err.to_string().starts_with("Malformed JSON in store file data/subscriptions.json"));
    }
}
