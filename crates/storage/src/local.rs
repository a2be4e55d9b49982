//! Local filesystem backend.
//!
//! Layout: `{root}/{bucket}/{key}`, with `/` in keys mapped to directories.
//! Writes go to a hidden temporary file that is hard-linked into place, so a
//! listing never observes a partially written object and an existing object
//! is never replaced.

use std::{fs, io};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stockflow_core::errors::{Error, Result};
use stockflow_core::storage::{ObjectStore, ObjectSummary};
use tracing::debug;

const TEMP_SUFFIX: &str = ".tmp";

/// [`ObjectStore`] rooted at a local directory.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Option<PathBuf> {
        is_safe_relative(bucket).then(|| self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        if !is_safe_relative(key) || key.ends_with('/') {
            return None;
        }
        self.bucket_dir(bucket).map(|dir| dir.join(key))
    }
}

/// Rejects empty names, absolute paths and `..` components.
fn is_safe_relative(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Collect every regular file under `dir` as a `/`-separated key.
fn walk(dir: &Path, key_prefix: &str, out: &mut Vec<ObjectSummary>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = if key_prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", key_prefix, name)
        };
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk(&entry.path(), &key, out)?;
        } else if metadata.is_file() && !is_temp_file(&name) {
            out.push(ObjectSummary {
                key,
                last_modified: DateTime::<Utc>::from(metadata.modified()?),
                size: metadata.len(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let dir = self
            .bucket_dir(bucket)
            .ok_or_else(|| Error::storage_read(bucket, prefix, "invalid bucket name"))?;

        let owned_prefix = prefix.to_string();
        let mut objects = tokio::task::spawn_blocking(move || -> io::Result<_> {
            let mut objects = Vec::new();
            if dir.is_dir() {
                walk(&dir, "", &mut objects)?;
            }
            objects.retain(|o| o.key.starts_with(&owned_prefix));
            Ok(objects)
        })
        .await
        .map_err(|e| Error::storage_read(bucket, prefix, e))?
        .map_err(|e| Error::storage_read(bucket, prefix, e))?;

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(
            "Local list {}/{}: {} objects",
            bucket,
            prefix,
            objects.len()
        );
        Ok(objects)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self
            .object_path(bucket, key)
            .ok_or_else(|| Error::storage_read(bucket, key, "invalid object key"))?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::storage_read(bucket, key, e))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self
            .object_path(bucket, key)
            .ok_or_else(|| Error::storage_write(bucket, key, "invalid object key"))?;
        let parent = path
            .parent()
            .ok_or_else(|| Error::storage_write(bucket, key, "object has no parent directory"))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::storage_write(bucket, key, "object has no file name"))?;
        let temp_path = parent.join(format!(".{}{}", file_name, TEMP_SUFFIX));

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::storage_write(bucket, key, e))?;
        tokio::fs::write(&temp_path, &body)
            .await
            .map_err(|e| Error::storage_write(bucket, key, e))?;

        // Linking fails if the target exists, so an object is never replaced.
        let linked = tokio::fs::hard_link(&temp_path, &path).await;
        let _ = tokio::fs::remove_file(&temp_path).await;
        linked.map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                Error::storage_write(bucket, key, "object already exists")
            }
            _ => Error::storage_write(bucket, key, e),
        })?;

        debug!("Local put {} ({} bytes)", path.display(), body.len());
        Ok(())
    }
}
