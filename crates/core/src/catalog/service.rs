//! Catalog service implementation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::CatalogError;
use super::types::{NewProduct, Product, ProductChanges, ProductInput};
use crate::storage::{ImageStore, ImageUpload};

/// Repository trait for product persistence.
pub trait CatalogRepository: Send + Sync {
    /// Insert a new product.
    fn create(
        &self,
        input: NewProduct,
    ) -> impl std::future::Future<Output = Result<Product, CatalogError>> + Send;

    /// Find product by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Product>, CatalogError>> + Send;

    /// List products owned by an account, oldest first.
    fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Apply changes. Returns `None` if the product does not exist.
    fn update(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> impl std::future::Future<Output = Result<Option<Product>, CatalogError>> + Send;

    /// Delete product by ID. Returns whether a row was removed.
    fn delete(&self, id: Uuid)
    -> impl std::future::Future<Output = Result<bool, CatalogError>> + Send;

    /// Resolve a company slug to the account that owns it.
    fn find_company_owner(
        &self,
        company_name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Uuid>, CatalogError>> + Send;
}

/// Product catalog service.
pub struct CatalogService<R: CatalogRepository> {
    images: Arc<ImageStore>,
    repo: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(images: Arc<ImageStore>, repo: Arc<R>) -> Self {
        Self { images, repo }
    }

    /// Create a product owned by `owner_id` with the uploaded images.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A form field is missing or the price is invalid
    /// - An image is not JPEG/PNG/GIF or is too large
    /// - Storage or persistence fails
    pub async fn add_product(
        &self,
        owner_id: Uuid,
        input: ProductInput,
        uploads: Vec<ImageUpload>,
    ) -> Result<Product, CatalogError> {
        // Validate before touching storage.
        input.clone().into_new(owner_id, Vec::new())?;

        let images = self.images.store_all(uploads).await?;
        let new_product = input.into_new(owner_id, images.clone())?;

        match self.repo.create(new_product).await {
            Ok(product) => {
                info!(
                    product_id = %product.id,
                    owner_id = %owner_id,
                    images = product.images.len(),
                    "product created"
                );
                Ok(product)
            }
            Err(e) => {
                self.images.remove_best_effort(&images).await;
                Err(e)
            }
        }
    }

    /// List the products of a company.
    ///
    /// A known company with no products yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` if no account has this company name.
    pub async fn list_by_company(&self, company_name: &str) -> Result<Vec<Product>, CatalogError> {
        let owner_id = self
            .repo
            .find_company_owner(company_name)
            .await?
            .ok_or_else(|| CatalogError::CompanyNotFound(company_name.to_string()))?;

        self.repo.list_by_owner(owner_id).await
    }

    /// Update a product owned by `caller_id`.
    ///
    /// Supplied text fields replace the current ones. Images are replaced
    /// wholesale only when new uploads are present; the superseded files are
    /// then removed from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The product does not exist or belongs to another account
    /// - A supplied field or image is invalid
    /// - Storage or persistence fails
    pub async fn update_product(
        &self,
        caller_id: Uuid,
        id: Uuid,
        input: ProductInput,
        uploads: Vec<ImageUpload>,
    ) -> Result<Product, CatalogError> {
        let existing = self.owned_product(caller_id, id).await?;
        let mut changes = input.into_changes()?;

        let replaced = if uploads.is_empty() {
            None
        } else {
            let stored = self.images.store_all(uploads).await?;
            changes.images = Some(stored.clone());
            Some(stored)
        };

        let updated = match self.repo.update(id, changes).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                self.discard(replaced.as_deref()).await;
                return Err(CatalogError::NotFound(id));
            }
            Err(e) => {
                self.discard(replaced.as_deref()).await;
                return Err(e);
            }
        };

        if replaced.is_some() {
            self.images.remove_best_effort(&existing.images).await;
        }

        info!(product_id = %id, images_replaced = replaced.is_some(), "product updated");
        Ok(updated)
    }

    /// Delete a product owned by `caller_id` and its images.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or belongs to another
    /// account.
    pub async fn delete_product(&self, caller_id: Uuid, id: Uuid) -> Result<(), CatalogError> {
        let existing = self.owned_product(caller_id, id).await?;

        if !self.repo.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        self.images.remove_best_effort(&existing.images).await;

        info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn owned_product(&self, caller_id: Uuid, id: Uuid) -> Result<Product, CatalogError> {
        let product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if product.owner_id != caller_id {
            return Err(CatalogError::NotOwner);
        }
        Ok(product)
    }

    async fn discard(&self, images: Option<&[String]>) {
        if let Some(images) = images {
            self.images.remove_best_effort(images).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageConfig, StorageProvider};
    use bytes::Bytes;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock repository for testing.
    #[derive(Default)]
    struct MockCatalogRepository {
        products: Mutex<HashMap<Uuid, Product>>,
        companies: Mutex<HashMap<String, Uuid>>,
    }

    impl MockCatalogRepository {
        fn add_company(&self, name: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.companies.lock().unwrap().insert(name.to_string(), id);
            id
        }
    }

    impl CatalogRepository for MockCatalogRepository {
        async fn create(&self, input: NewProduct) -> Result<Product, CatalogError> {
            let product = Product {
                id: Uuid::new_v4(),
                product_name: input.product_name,
                description: input.description,
                price: input.price,
                images: input.images,
                owner_id: input.owner_id,
                created_at: Utc::now(),
            };
            self.products
                .lock()
                .unwrap()
                .insert(product.id, product.clone());
            Ok(product)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
            Ok(self.products.lock().unwrap().get(&id).cloned())
        }

        async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>, CatalogError> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn update(
            &self,
            id: Uuid,
            changes: ProductChanges,
        ) -> Result<Option<Product>, CatalogError> {
            let mut products = self.products.lock().unwrap();
            let Some(product) = products.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(name) = changes.product_name {
                product.product_name = name;
            }
            if let Some(description) = changes.description {
                product.description = description;
            }
            if let Some(price) = changes.price {
                product.price = price;
            }
            if let Some(images) = changes.images {
                product.images = images;
            }
            Ok(Some(product.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
            Ok(self.products.lock().unwrap().remove(&id).is_some())
        }

        async fn find_company_owner(
            &self,
            company_name: &str,
        ) -> Result<Option<Uuid>, CatalogError> {
            Ok(self.companies.lock().unwrap().get(company_name).copied())
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        repo: Arc<MockCatalogRepository>,
        service: CatalogService<MockCatalogRepository>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        let store = ImageStore::from_config(config).expect("should create store");
        let repo = Arc::new(MockCatalogRepository::default());
        let service = CatalogService::new(Arc::new(store), repo.clone());
        Fixture { dir, repo, service }
    }

    fn form(name: &str, price: &str) -> ProductInput {
        ProductInput {
            product_name: Some(name.to_string()),
            description: Some("Comfortable ride".to_string()),
            price: Some(price.to_string()),
        }
    }

    fn jpeg(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            content_type: "image/jpeg".to_string(),
            data: Bytes::from_static(b"\xff\xd8\xff\xe0"),
        }
    }

    #[tokio::test]
    async fn test_add_product_stores_images() {
        let fx = fixture();
        let owner = fx.repo.add_company("acme-rentals");

        let product = fx
            .service
            .add_product(owner, form("Sedan", "80"), vec![jpeg("front.jpg"), jpeg("back.jpg")])
            .await
            .unwrap();

        assert_eq!(product.price, dec!(80));
        assert_eq!(product.images.len(), 2);
        assert_ne!(product.images[0], product.images[1]);
        for image in &product.images {
            assert!(fx.dir.path().join(image).exists());
        }
    }

    #[tokio::test]
    async fn test_add_product_missing_field_stores_nothing() {
        let fx = fixture();
        let owner = fx.repo.add_company("acme-rentals");

        let mut input = form("Sedan", "80");
        input.price = None;
        let result = fx.service.add_product(owner, input, vec![jpeg("a.jpg")]).await;

        assert!(matches!(result, Err(CatalogError::MissingField("price"))));
        assert_eq!(std::fs::read_dir(fx.dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_list_by_company_distinguishes_empty_from_unknown() {
        let fx = fixture();
        fx.repo.add_company("acme-rentals");

        let empty = fx.service.list_by_company("acme-rentals").await.unwrap();
        let unknown = fx.service.list_by_company("nobody").await;

        assert!(empty.is_empty());
        assert!(matches!(unknown, Err(CatalogError::CompanyNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_without_images_keeps_existing() {
        let fx = fixture();
        let owner = fx.repo.add_company("acme-rentals");
        let product = fx
            .service
            .add_product(owner, form("Sedan", "80"), vec![jpeg("a.jpg")])
            .await
            .unwrap();

        let updated = fx
            .service
            .update_product(owner, product.id, form("Sedan XL", "95.50"), vec![])
            .await
            .unwrap();

        assert_eq!(updated.product_name, "Sedan XL");
        assert_eq!(updated.price, dec!(95.50));
        assert_eq!(updated.images, product.images);
    }

    #[tokio::test]
    async fn test_update_with_images_replaces_and_cleans_up() {
        let fx = fixture();
        let owner = fx.repo.add_company("acme-rentals");
        let product = fx
            .service
            .add_product(owner, form("Sedan", "80"), vec![jpeg("a.jpg")])
            .await
            .unwrap();

        let updated = fx
            .service
            .update_product(owner, product.id, ProductInput::default(), vec![jpeg("new.jpg")])
            .await
            .unwrap();

        assert_eq!(updated.images.len(), 1);
        assert_ne!(updated.images, product.images);
        assert!(!fx.dir.path().join(&product.images[0]).exists());
        assert!(fx.dir.path().join(&updated.images[0]).exists());
        assert_eq!(updated.product_name, "Sedan");
    }

    #[tokio::test]
    async fn test_update_and_delete_require_ownership() {
        let fx = fixture();
        let owner = fx.repo.add_company("acme-rentals");
        let intruder = fx.repo.add_company("fleet");
        let product = fx
            .service
            .add_product(owner, form("Sedan", "80"), vec![])
            .await
            .unwrap();

        let update = fx
            .service
            .update_product(intruder, product.id, form("Mine", "1"), vec![])
            .await;
        let delete = fx.service.delete_product(intruder, product.id).await;

        assert!(matches!(update, Err(CatalogError::NotOwner)));
        assert!(matches!(delete, Err(CatalogError::NotOwner)));
    }

    #[tokio::test]
    async fn test_delete_removes_product_and_images() {
        let fx = fixture();
        let owner = fx.repo.add_company("acme-rentals");
        let product = fx
            .service
            .add_product(owner, form("Sedan", "80"), vec![jpeg("a.jpg")])
            .await
            .unwrap();

        fx.service.delete_product(owner, product.id).await.unwrap();

        assert!(!fx.dir.path().join(&product.images[0]).exists());
        let again = fx.service.delete_product(owner, product.id).await;
        assert!(matches!(again, Err(CatalogError::NotFound(_))));
    }
}
