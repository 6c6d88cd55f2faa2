use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::product::domain::{Product, ProductDraft};
use crate::product::repository::ProductRepository;

use models::product;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn find_existing(&self, id: i32) -> Result<product::Model, ServiceError> {
        product::find(&self.db, id).await?.ok_or(ServiceError::NotFound(id))
    }
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let rows = product::list_desc(&self.db).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError> {
        Ok(self.find_existing(id).await?.into())
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        let created = product::create(&self.db, &draft.name, draft.price, draft.availability).await?;
        Ok(created.into())
    }

    async fn replace(&self, id: i32, draft: ProductDraft) -> Result<Product, ServiceError> {
        let existing = self.find_existing(id).await?;
        let updated = product::replace(&self.db, existing, &draft.name, draft.price, draft.availability).await?;
        Ok(updated.into())
    }

    async fn toggle_availability(&self, id: i32) -> Result<Product, ServiceError> {
        let existing = self.find_existing(id).await?;
        Ok(product::toggle_availability(&self.db, existing).await?.into())
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if product::delete(&self.db, id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }
}
