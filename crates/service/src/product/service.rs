use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{Product, ProductDraft};
use super::repository::ProductRepository;
use crate::errors::ServiceError;

/// Product business service independent of web framework.
/// Each operation is a single lookup plus at most one mutation.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo.get_by_id(id).await
    }

    /// Persist a new product.
    ///
    /// # Examples
    /// ```
    /// use service::product::{ProductDraft, ProductService, repository::mock::InMemoryProductRepository};
    /// use std::sync::Arc;
    /// let svc = ProductService::new(Arc::new(InMemoryProductRepository::new()));
    /// let p = tokio_test::block_on(svc.create(ProductDraft::new("Mouse Testing", 40.0))).unwrap();
    /// assert_eq!(p.id, 1);
    /// assert!(p.availability);
    /// ```
    #[instrument(skip(self, draft), fields(name = %draft.name, price = draft.price))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        draft.check()?;
        let product = self.repo.create(draft).await?;
        info!(id = product.id, "product_created");
        Ok(product)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name, price = draft.price))]
    pub async fn replace(&self, id: i32, draft: ProductDraft) -> Result<Product, ServiceError> {
        draft.check()?;
        let product = self.repo.replace(id, draft).await?;
        info!(id, "product_replaced");
        Ok(product)
    }

    /// Flip `availability`; calling twice restores the original value.
    ///
    /// # Examples
    /// ```
    /// use service::product::{ProductDraft, ProductService, repository::mock::InMemoryProductRepository};
    /// use std::sync::Arc;
    /// let svc = ProductService::new(Arc::new(InMemoryProductRepository::new()));
    /// let p = tokio_test::block_on(svc.create(ProductDraft::new("Desk", 120.0))).unwrap();
    /// let off = tokio_test::block_on(svc.toggle_availability(p.id)).unwrap();
    /// assert!(!off.availability);
    /// ```
    #[instrument(skip(self))]
    pub async fn toggle_availability(&self, id: i32) -> Result<Product, ServiceError> {
        let product = self.repo.toggle_availability(id).await?;
        info!(id, availability = product.availability, "product_availability_toggled");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        info!(id, "product_deleted");
        Ok(())
    }
}
