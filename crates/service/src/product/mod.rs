//! Product catalogue: value types, validation rules, persistence and service.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Product, ProductDraft};
pub use repository::ProductRepository;
pub use service::ProductService;
