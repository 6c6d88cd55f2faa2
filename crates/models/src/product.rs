use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait, EntityTrait, QueryOrder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub availability: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MAX_LEN: usize = 100;

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.is_empty() {
        return Err(errors::ModelError::Validation("name must not be empty".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name must be at most {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(errors::ModelError::Validation("price must be a number greater than 0".into()));
    }
    Ok(())
}

/// All products, newest id first.
pub async fn list_desc(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find().order_by_desc(Column::Id).all(db).await?;
    Ok(rows)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    availability: bool,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_price(price)?;

    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        availability: Set(availability),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite every mutable column of an existing row.
pub async fn replace(
    db: &DatabaseConnection,
    existing: Model,
    name: &str,
    price: f64,
    availability: bool,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_price(price)?;

    let mut am: ActiveModel = existing.into();
    am.name = Set(name.to_string());
    am.price = Set(price);
    am.availability = Set(availability);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn toggle_availability(db: &DatabaseConnection, existing: Model) -> Result<Model, errors::ModelError> {
    let flipped = !existing.availability;
    let mut am: ActiveModel = existing.into();
    am.availability = Set(flipped);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Hard delete; returns true if a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(validate_name("Mouse").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn price_rules() {
        assert!(validate_price(40.0).is_ok());
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-300.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }
}
