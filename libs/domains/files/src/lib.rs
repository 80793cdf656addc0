//! Files Domain
//!
//! Upload and download of opaque files through a [`BlobStore`]. The bundled
//! [`LocalBlobStore`] keeps them in one directory on disk.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_files::{handlers, BlobStorageConfig, LocalBlobStore};
//!
//! # async fn example() -> Result<(), domain_files::FileError> {
//! let config = BlobStorageConfig::default();
//! let store = LocalBlobStore::open(&config.root).await?;
//! let router = handlers::router(store, config.max_upload_bytes);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

pub use config::BlobStorageConfig;
pub use error::{FileError, FileResult};
pub use store::{BlobStore, ByteStream, FileInfo, LocalBlobStore, validate_file_name};
