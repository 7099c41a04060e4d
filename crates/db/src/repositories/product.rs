//! Product repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::company_owner;
use crate::entities::products;
use ridebook_core::catalog::{
    CatalogError, CatalogRepository, NewProduct, Product, ProductChanges,
};

/// Product repository implementation.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl CatalogRepository for ProductRepository {
    async fn create(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let now = chrono::Utc::now().into();
        let active_model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(input.owner_id),
            product_name: Set(input.product_name),
            description: Set(input.description),
            price: Set(input.price),
            images: Set(input.images),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>, CatalogError> {
        let models = products::Entity::find()
            .filter(products::Column::OwnerId.eq(owner_id))
            .order_by_asc(products::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, CatalogError> {
        let Some(existing) = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut active_model: products::ActiveModel = existing.into();
        if let Some(product_name) = changes.product_name {
            active_model.product_name = Set(product_name);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(description);
        }
        if let Some(price) = changes.price {
            active_model.price = Set(price);
        }
        if let Some(images) = changes.images {
            active_model.images = Set(images);
        }

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(Some(to_domain(model)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_company_owner(&self, company_name: &str) -> Result<Option<Uuid>, CatalogError> {
        company_owner(&self.db, company_name)
            .await
            .map_err(|e| CatalogError::repository(e.to_string()))
    }
}

/// Convert database model to domain model.
fn to_domain(model: products::Model) -> Product {
    Product {
        id: model.id,
        product_name: model.product_name,
        description: model.description,
        price: model.price,
        images: model.images,
        owner_id: model.owner_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
