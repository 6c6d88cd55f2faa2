use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::validation::{FieldError, Location, ValidationErrors, NAME_EMPTY, PRICE_NOT_POSITIVE};

/// A persisted product as returned to callers. Plain data; mutations go through
/// [`ProductRepository`](super::ProductRepository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub availability: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<models::product::Model> for Product {
    fn from(m: models::product::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            price: m.price,
            availability: m.availability,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// The mutable fields of a product, as submitted on create or full replace.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub availability: bool,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self { name: name.into(), price, availability: true }
    }

    pub fn with_availability(mut self, availability: bool) -> Self {
        self.availability = availability;
        self
    }

    /// Re-check the invariants every stored product must satisfy.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.push(invariant("name", NAME_EMPTY));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            errors.push(invariant("price", PRICE_NOT_POSITIVE));
        }
        errors.into_result(())
    }
}

fn invariant(path: &'static str, msg: &str) -> FieldError {
    FieldError { kind: "field", value: None, msg: msg.to_string(), path: Some(path), location: Location::Body }
}
