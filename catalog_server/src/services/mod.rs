//! Catalog business logic. Services work against [`crate::store::Store`]
//! and return [`crate::errors::ApiError`] ready for the HTTP layer.

pub mod catalog_service;
pub mod category_service;
pub mod pagination;
pub mod product_service;
pub mod query_service;
pub mod upload_service;
pub mod user_service;
