use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::path::PathBuf;

/// Local blob storage settings
#[derive(Clone, Debug)]
pub struct BlobStorageConfig {
    /// Directory holding uploaded files
    pub root: PathBuf,
    /// Largest multipart request accepted by the upload endpoint
    pub max_upload_bytes: usize,
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/blobs"),
            max_upload_bytes: 30_000_000,
        }
    }
}

impl FromEnv for BlobStorageConfig {
    /// - `BLOB_STORAGE_PATH` (default: ./data/blobs)
    /// - `MAX_UPLOAD_BYTES` (default: 30000000)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            root: PathBuf::from(env_or_default("BLOB_STORAGE_PATH", "./data/blobs")),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(["BLOB_STORAGE_PATH", "MAX_UPLOAD_BYTES"], || {
            let config = BlobStorageConfig::from_env().unwrap();
            assert_eq!(config.root, PathBuf::from("./data/blobs"));
            assert_eq!(config.max_upload_bytes, 30_000_000);
        });
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("BLOB_STORAGE_PATH", Some("/var/lib/shop/blobs")),
                ("MAX_UPLOAD_BYTES", Some("1024")),
            ],
            || {
                let config = BlobStorageConfig::from_env().unwrap();
                assert_eq!(config.root, PathBuf::from("/var/lib/shop/blobs"));
                assert_eq!(config.max_upload_bytes, 1024);
            },
        );
    }

    #[test]
    fn test_invalid_upload_limit() {
        temp_env::with_var("MAX_UPLOAD_BYTES", Some("lots"), || {
            assert!(BlobStorageConfig::from_env().is_err());
        });
    }
}
