//! Flat-file store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Locations of the user and subscription store files
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the user store JSON file
    #[serde(default = "default_user_db_path")]
    pub user_db_path: PathBuf,

    /// Path of the subscription store JSON file
    #[serde(default = "default_subscription_db_path")]
    pub subscription_db_path: PathBuf,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_db_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.user_db_path"));
        }
        if self.subscription_db_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.subscription_db_path"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            user_db_path: default_user_db_path(),
            subscription_db_path: default_subscription_db_path(),
        }
    }
}

fn default_user_db_path() -> PathBuf {
    PathBuf::from("data/users.json")
}

fn default_subscription_db_path() -> PathBuf {
    PathBuf::from("data/subscriptions.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.user_db_path, PathBuf::from("data/users.json"));
        assert_eq!(config.subscription_db_path, PathBuf::from("data/subscriptions.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        let config = StorageConfig {
            user_db_path: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("storage.user_db_path"))
        );
    }
}
