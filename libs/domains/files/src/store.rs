use async_trait::async_trait;
use axum::body::Bytes;
use futures::Stream;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tempfile::TempPath;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::{ReaderStream, StreamReader};
use utoipa::ToSchema;

use crate::error::{FileError, FileResult};

const MAX_FILE_NAME_LEN: usize = 255;

/// Scratch files are `.upload.<random>.part`, independent of the target name.
const PART_PREFIX: &str = ".upload.";
const PART_SUFFIX: &str = ".part";

/// Streamed file content.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'a>>;

/// A stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FileInfo {
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

/// Blob storage abstraction
///
/// Names are flat: a store never creates or follows directories.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `content` under `name`, replacing any previous file.
    ///
    /// Returns the number of bytes written. Empty content is rejected with
    /// [`FileError::NotSelected`] and leaves no file behind.
    async fn upload(&self, name: &str, content: ByteStream<'_>) -> FileResult<u64>;

    /// Open a stored file for streaming.
    async fn download(&self, name: &str) -> FileResult<ByteStream<'static>>;

    /// All stored files ordered by name.
    async fn list(&self) -> FileResult<Vec<FileInfo>>;

    async fn details(&self, name: &str) -> FileResult<FileInfo>;
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    async fn upload(&self, name: &str, content: ByteStream<'_>) -> FileResult<u64> {
        (**self).upload(name, content).await
    }

    async fn download(&self, name: &str) -> FileResult<ByteStream<'static>> {
        (**self).download(name).await
    }

    async fn list(&self) -> FileResult<Vec<FileInfo>> {
        (**self).list().await
    }

    async fn details(&self, name: &str) -> FileResult<FileInfo> {
        (**self).details(name).await
    }
}

/// Reject names that could escape the storage root or break headers.
///
/// Leading dots are reserved for in-progress uploads.
pub fn validate_file_name(name: &str) -> FileResult<()> {
    let invalid = name.is_empty()
        || name.len() > MAX_FILE_NAME_LEN
        || name.starts_with('.')
        || name.contains("..")
        || name.contains(['/', '\\', '"'])
        || name.chars().any(char::is_control);

    if invalid {
        return Err(FileError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn open_error(name: &str, e: io::Error) -> FileError {
    match e.kind() {
        io::ErrorKind::NotFound => FileError::NotFound(name.to_string()),
        _ => FileError::Io(e),
    }
}

/// Files kept in a single directory on the local filesystem
#[derive(Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Use `root` as the storage directory, creating it when missing.
    pub async fn open(root: impl Into<PathBuf>) -> FileResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        tracing::info!(root = %root.display(), "Local blob store ready");

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fails when the root directory is gone or no longer a directory.
    pub async fn check_health(&self) -> FileResult<()> {
        let metadata = fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(FileError::Io(io::Error::other(format!(
                "{} is not a directory",
                self.root.display()
            ))));
        }
        Ok(())
    }

    fn path_for(&self, name: &str) -> FileResult<PathBuf> {
        validate_file_name(name)?;
        Ok(self.root.join(name))
    }

    /// Fresh scratch file in the root, deleted when the returned path drops.
    fn scratch_file(&self) -> io::Result<(fs::File, TempPath)> {
        let (file, path) = tempfile::Builder::new()
            .prefix(PART_PREFIX)
            .suffix(PART_SUFFIX)
            .tempfile_in(&self.root)?
            .into_parts();
        Ok((fs::File::from_std(file), path))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, name: &str, content: ByteStream<'_>) -> FileResult<u64> {
        let target = self.path_for(name)?;

        // Every early return or a dropped future removes the scratch file
        let (mut file, part) = self.scratch_file()?;
        let mut reader = StreamReader::new(content);
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        if written == 0 {
            return Err(FileError::NotSelected);
        }
        file.flush().await?;
        drop(file);

        part.persist(&target).map_err(|e| FileError::Io(e.error))?;
        tracing::debug!(name, bytes = written, "Stored file");
        Ok(written)
    }

    async fn download(&self, name: &str) -> FileResult<ByteStream<'static>> {
        let path = self.path_for(name)?;
        let file = fs::File::open(&path).await.map_err(|e| open_error(name, e))?;
        if !file.metadata().await?.is_file() {
            return Err(FileError::NotFound(name.to_string()));
        }

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn list(&self) -> FileResult<Vec<FileInfo>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                files.push(FileInfo {
                    name,
                    size: metadata.len(),
                });
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn details(&self, name: &str) -> FileResult<FileInfo> {
        let path = self.path_for(name)?;
        let metadata = fs::metadata(&path).await.map_err(|e| open_error(name, e))?;
        if !metadata.is_file() {
            return Err(FileError::NotFound(name.to_string()));
        }

        Ok(FileInfo {
            name: name.to_string(),
            size: metadata.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{StreamExt, TryStreamExt, stream};
    use std::time::Duration;

    fn chunks(parts: &[&'static [u8]]) -> ByteStream<'static> {
        let items: Vec<io::Result<Bytes>> =
            parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        Box::pin(stream::iter(items))
    }

    async fn read_all(stream: ByteStream<'static>) -> Vec<u8> {
        stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .unwrap()
    }

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::open(dir.path().join("blobs")).await.unwrap();
        (dir, store)
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("report.pdf").is_ok());
        assert!(validate_file_name("photo 1.JPG").is_ok());

        for bad in [
            "",
            ".",
            "..",
            ".hidden",
            "../etc/passwd",
            "a/b",
            "a\\b",
            "a..b",
            "quote\".txt",
            "tab\t.txt",
        ] {
            assert!(
                matches!(validate_file_name(bad), Err(FileError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }

        assert!(validate_file_name(&"x".repeat(256)).is_err());
    }

    #[tokio::test]
    async fn test_open_creates_root() {
        let (dir, store) = store().await;
        assert!(store.root().is_dir());
        assert!(store.root().starts_with(dir.path()));
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let (_dir, store) = store().await;

        let written = store
            .upload("hello.txt", chunks(&[b"hello ", b"world"]))
            .await
            .unwrap();
        assert_eq!(written, 11);

        let content = read_all(store.download("hello.txt").await.unwrap()).await;
        assert_eq!(content, b"hello world");
    }

    #[tokio::test]
    async fn test_upload_replaces_existing() {
        let (_dir, store) = store().await;

        store.upload("a.txt", chunks(&[b"first"])).await.unwrap();
        store.upload("a.txt", chunks(&[b"2nd"])).await.unwrap();

        let info = store.details("a.txt").await.unwrap();
        assert_eq!(info.size, 3);
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected_and_leaves_nothing() {
        let (_dir, store) = store().await;

        let result = store.upload("empty.txt", chunks(&[])).await;
        assert!(matches!(result, Err(FileError::NotSelected)));

        let mut entries = fs::read_dir(store.root()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_stream_removes_partial_file() {
        let (_dir, store) = store().await;

        let broken: ByteStream<'static> = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::InvalidData, "connection reset")),
        ]));
        let result = store.upload("broken.bin", broken).await;
        assert!(matches!(result, Err(FileError::Io(_))));

        assert!(store.list().await.unwrap().is_empty());
        let mut entries = fs::read_dir(store.root()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_longest_valid_name_is_stored() {
        let (_dir, store) = store().await;
        let name = "n".repeat(MAX_FILE_NAME_LEN);

        let written = store.upload(&name, chunks(&[b"data"])).await.unwrap();
        assert_eq!(written, 4);
        assert_eq!(store.details(&name).await.unwrap().size, 4);
    }

    #[tokio::test]
    async fn test_dropped_upload_removes_scratch_file() {
        let (_dir, store) = store().await;
        let stalled: ByteStream<'static> = Box::pin(
            stream::iter(vec![Ok(Bytes::from_static(b"first chunk"))])
                .chain(stream::pending::<io::Result<Bytes>>()),
        );

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            store.upload("stalled.bin", stalled),
        )
        .await;
        assert!(result.is_err());

        let mut entries = fs::read_dir(store.root()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_name_never_touches_disk() {
        let (dir, store) = store().await;

        let result = store.upload("../escape.txt", chunks(&[b"x"])).await;
        assert!(matches!(result, Err(FileError::InvalidName(_))));
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_list_and_details() {
        let (_dir, store) = store().await;

        store.upload("b.txt", chunks(&[b"bb"])).await.unwrap();
        store.upload("a.txt", chunks(&[b"a"])).await.unwrap();
        fs::create_dir(store.root().join("nested")).await.unwrap();

        let files = store.list().await.unwrap();
        assert_eq!(
            files,
            vec![
                FileInfo { name: "a.txt".into(), size: 1 },
                FileInfo { name: "b.txt".into(), size: 2 },
            ]
        );

        assert_eq!(store.details("b.txt").await.unwrap().size, 2);
        assert!(matches!(
            store.details("nested").await,
            Err(FileError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_check_health() {
        let (_dir, store) = store().await;
        assert!(store.check_health().await.is_ok());

        fs::remove_dir(store.root()).await.unwrap();
        assert!(store.check_health().await.is_err());
    }

    #[tokio::test]
    async fn test_shared_store_delegates() {
        let (_dir, store) = store().await;
        let shared = Arc::new(store);

        shared.upload("x.txt", chunks(&[b"xyz"])).await.unwrap();
        assert_eq!(shared.details("x.txt").await.unwrap().size, 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let (_dir, store) = store().await;

        assert!(matches!(
            store.download("missing.txt").await,
            Err(FileError::NotFound(_))
        ));
        assert!(matches!(
            store.details("missing.txt").await,
            Err(FileError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_download_streams_in_chunks() {
        let (_dir, store) = store().await;
        let big: ByteStream<'static> =
            Box::pin(stream::iter(vec![Ok(Bytes::from(vec![7u8; 64 * 1024]))]));
        store.upload("big.bin", big).await.unwrap();

        let count = store.download("big.bin").await.unwrap().count().await;
        assert!(count > 1);
    }
}
