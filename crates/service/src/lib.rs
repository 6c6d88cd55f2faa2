//! Service layer providing the product catalogue operations on top of models.
//! - Separates business logic from data access (`ProductRepository`).
//! - Owns the request validation rules shared by every HTTP front end.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test_support;
