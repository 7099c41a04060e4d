//! Image store implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};
use tracing::{debug, warn};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// One uploaded image as received from a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original client file name, used only for its extension.
    pub file_name: Option<String>,
    /// Declared content type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Image store for product pictures.
pub struct ImageStore {
    operator: Operator,
    config: StorageConfig,
}

impl ImageStore {
    /// Create a new image store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against the size limit and the image MIME list.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate the stored name for an upload: `{uuid-v4}{.ext}`.
    #[must_use]
    pub fn generate_name(upload: &ImageUpload) -> String {
        let ext = upload
            .file_name
            .as_deref()
            .and_then(client_extension)
            .unwrap_or_else(|| extension_for_mime(&upload.content_type).to_string());

        format!("{}{ext}", Uuid::new_v4())
    }

    /// Validate and write every upload. Returns the stored names in order.
    ///
    /// Nothing is written unless every upload validates. If a write fails,
    /// the images already written by this call are removed again.
    ///
    /// # Errors
    ///
    /// Returns an error if any upload is rejected or a write fails.
    pub async fn store_all(&self, uploads: Vec<ImageUpload>) -> Result<Vec<String>, StorageError> {
        for upload in &uploads {
            self.validate_upload(&upload.content_type, upload.data.len() as u64)?;
        }

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let name = Self::generate_name(&upload);
            if let Err(e) = self.operator.write(&name, upload.data).await {
                self.remove_best_effort(&stored).await;
                return Err(e.into());
            }
            debug!(image = %name, "image stored");
            stored.push(name);
        }

        Ok(stored)
    }

    /// Delete one stored image.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a bare file name or deletion fails.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        self.operator.delete(name).await.map_err(StorageError::from)
    }

    /// Delete stored images, logging failures instead of returning them.
    pub async fn remove_best_effort(&self, names: &[String]) {
        for name in names {
            if let Err(e) = self.delete(name).await {
                warn!(image = %name, error = %e, "failed to remove image");
            }
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Lowercased extension of a client file name, if it is short and plain.
fn client_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let plain = !stem.is_empty()
        && (1..=5).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    plain.then(|| format!(".{}", ext.to_ascii_lowercase()))
}

fn extension_for_mime(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        _ => "",
    }
}

/// Stored names are flat: no separators, no parent references.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(StorageError::InvalidKey(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn png(name: Option<&str>, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.map(String::from),
            content_type: "image/png".to_string(),
            data: Bytes::from(vec![0u8; len]),
        }
    }

    fn local_store(dir: &tempfile::TempDir) -> ImageStore {
        let config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        ImageStore::from_config(config).expect("should create store")
    }

    #[rstest]
    #[case(Some("car.PNG"), ".png")]
    #[case(Some("front view.jpeg"), ".jpeg")]
    #[case(Some("noext"), ".png")]
    #[case(Some(".hidden"), ".png")]
    #[case(Some("weird.p/ng"), ".png")]
    #[case(None, ".png")]
    fn test_generate_name_extension(#[case] file_name: Option<&str>, #[case] ext: &str) {
        let name = ImageStore::generate_name(&png(file_name, 1));

        let (stem, got) = name.split_at(36);
        assert!(Uuid::parse_str(stem).is_ok());
        assert_eq!(got, ext);
    }

    #[test]
    fn test_validate_upload_size() {
        let config =
            StorageConfig::new(StorageProvider::local_fs("./test")).with_max_file_size(1024);
        let store = ImageStore::from_config(config).expect("should create store");

        assert!(store.validate_upload("image/png", 1024).is_ok());

        let err = store.validate_upload("image/png", 1025).unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_validate_upload_mime_type() {
        let config = StorageConfig::new(StorageProvider::local_fs("./test"));
        let store = ImageStore::from_config(config).expect("should create store");

        let err = store.validate_upload("application/pdf", 10).unwrap_err();
        assert!(matches!(err, StorageError::InvalidMimeType { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("../secret")]
    #[case("a/b.png")]
    #[case(".env")]
    fn test_validate_name_rejects_paths(#[case] name: &str) {
        assert!(matches!(validate_name(name), Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_store_and_delete_on_local_fs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = local_store(&dir);

        let names = store
            .store_all(vec![png(Some("a.png"), 16), png(Some("b.gif"), 8)])
            .await
            .unwrap();

        assert_eq!(names.len(), 2);
        for name in &names {
            assert!(dir.path().join(name).exists());
        }

        store.delete(&names[0]).await.unwrap();
        assert!(!dir.path().join(&names[0]).exists());
    }

    #[tokio::test]
    async fn test_store_all_writes_nothing_when_one_upload_is_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = local_store(&dir);

        let mut bad = png(Some("doc.pdf"), 4);
        bad.content_type = "application/pdf".to_string();

        let result = store.store_all(vec![png(Some("a.png"), 4), bad]).await;

        assert!(matches!(result, Err(StorageError::InvalidMimeType { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_best_effort_ignores_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = local_store(&dir);

        store
            .remove_best_effort(&["missing.png".to_string(), "../escape.png".to_string()])
            .await;
    }
}
