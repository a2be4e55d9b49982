mod aws;

pub use aws::AwsSecretsManagerStore;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use stockflow_core::{errors::Error, secrets::SecretStore, Result};

const CURRENT_VERSION: u32 = 1;

/// Secrets kept in a local JSON file:
///
/// ```json
/// { "version": 1, "secrets": { "Yahoo_finance_Api": { "yahoo_finance_api_key": "..." } } }
/// ```
///
/// A secret may be stored as a JSON string (the raw secret payload) or as an
/// inline object, which is handed on re-serialized.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
}

#[derive(Deserialize)]
struct PlainSecrets {
    version: u32,
    secrets: HashMap<String, Value>,
}

impl FileSecretStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_store(&self, name: &str) -> Result<PlainSecrets> {
        let access_error = |message: String| Error::SecretAccess {
            name: name.to_string(),
            message,
        };

        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| access_error(format!("{}: {}", self.path.display(), e)))?;
        let store: PlainSecrets = serde_json::from_slice(&raw)
            .map_err(|e| access_error(format!("{}: {}", self.path.display(), e)))?;

        if store.version != CURRENT_VERSION {
            return Err(access_error(format!(
                "unsupported secrets file version {}",
                store.version
            )));
        }
        Ok(store)
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let mut store = self.read_store(name).await?;
        Ok(store.secrets.remove(name).map(|value| match value {
            Value::String(raw) => raw,
            other => other.to_string(),
        }))
    }
}

pub fn build_secret_store(path: PathBuf) -> FileSecretStore {
    FileSecretStore::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stockflow_core::{errors::ErrorKind, fetch_secret};
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_inline_object_secret() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("secrets.json");
        fs::write(
            &file,
            r#"{"version":1,"secrets":{"api":{"yahoo_finance_api_key":"abc"}}}"#,
        )
        .unwrap();
        let store = build_secret_store(file);

        let bundle = fetch_secret(&store, "api").await.unwrap();
        assert_eq!(bundle.get("yahoo_finance_api_key"), Some("abc"));
    }

    #[tokio::test]
    async fn reads_string_secret_verbatim() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("secrets.json");
        fs::write(
            &file,
            r#"{"version":1,"secrets":{"api":"{\"yahoo_finance_api_key\":\"xyz\"}","bad":"plain"}}"#,
        )
        .unwrap();
        let store = build_secret_store(file);

        assert_eq!(
            store.get_secret("api").await.unwrap().as_deref(),
            Some(r#"{"yahoo_finance_api_key":"xyz"}"#)
        );
        let err = fetch_secret(&store, "bad").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SecretFormat);
    }

    #[tokio::test]
    async fn unknown_name_is_none() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("secrets.json");
        fs::write(&file, r#"{"version":1,"secrets":{}}"#).unwrap();
        let store = build_secret_store(file);

        assert!(store.get_secret("api").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_is_access_error() {
        let dir = tempdir().unwrap();
        let missing = build_secret_store(dir.path().join("absent.json"));
        let err = missing.get_secret("api").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SecretAccess);

        let file = dir.path().join("corrupt.json");
        fs::write(&file, "not json").unwrap();
        let err = build_secret_store(file).get_secret("api").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SecretAccess);

        let file = dir.path().join("future.json");
        fs::write(&file, r#"{"version":2,"secrets":{}}"#).unwrap();
        let err = build_secret_store(file).get_secret("api").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SecretAccess);
    }
}
