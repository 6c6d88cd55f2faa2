use async_trait::async_trait;

use super::domain::{Product, ProductDraft};
use crate::errors::ServiceError;

/// Row-level persistence for products. Lookups of a missing id yield
/// `ServiceError::NotFound`.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, highest id first.
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError>;
    async fn create(&self, draft: ProductDraft) -> Result<Product, ServiceError>;
    /// Overwrite name, price and availability.
    async fn replace(&self, id: i32, draft: ProductDraft) -> Result<Product, ServiceError>;
    async fn toggle_availability(&self, id: i32) -> Result<Product, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Table {
        rows: BTreeMap<i32, Product>,
        last_id: i32,
    }

    /// Ids auto-increment from 1 and are never reused, like a SERIAL column.
    #[derive(Default)]
    pub struct InMemoryProductRepository {
        table: Mutex<Table>,
    }

    impl InMemoryProductRepository {
        pub fn new() -> Self { Self::default() }

        fn with_row<T>(&self, id: i32, f: impl FnOnce(&mut Product) -> T) -> Result<T, ServiceError> {
            let mut table = self.table.lock().map_err(|e| ServiceError::Db(e.to_string()))?;
            let row = table.rows.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
            Ok(f(row))
        }
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn list(&self) -> Result<Vec<Product>, ServiceError> {
            let table = self.table.lock().map_err(|e| ServiceError::Db(e.to_string()))?;
            Ok(table.rows.values().rev().cloned().collect())
        }

        async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError> {
            self.with_row(id, |p| p.clone())
        }

        async fn create(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
            let mut table = self.table.lock().map_err(|e| ServiceError::Db(e.to_string()))?;
            table.last_id += 1;
            let now = Utc::now().into();
            let product = Product {
                id: table.last_id,
                name: draft.name,
                price: draft.price,
                availability: draft.availability,
                created_at: now,
                updated_at: now,
            };
            table.rows.insert(product.id, product.clone());
            Ok(product)
        }

        async fn replace(&self, id: i32, draft: ProductDraft) -> Result<Product, ServiceError> {
            self.with_row(id, |p| {
                p.name = draft.name;
                p.price = draft.price;
                p.availability = draft.availability;
                p.updated_at = Utc::now().into();
                p.clone()
            })
        }

        async fn toggle_availability(&self, id: i32) -> Result<Product, ServiceError> {
            self.with_row(id, |p| {
                p.availability = !p.availability;
                p.updated_at = Utc::now().into();
                p.clone()
            })
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            let mut table = self.table.lock().map_err(|e| ServiceError::Db(e.to_string()))?;
            table.rows.remove(&id).map(|_| ()).ok_or(ServiceError::NotFound(id))
        }
    }

}
