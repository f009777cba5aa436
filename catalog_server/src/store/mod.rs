//! Persistence seam.
//!
//! Route handlers and services only see [`Store`]. [`PgStore`] is the
//! production backend (diesel over a deadpool of async Postgres
//! connections); [`MemoryStore`] keeps everything in process and backs demo
//! mode and the HTTP tests.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::dashboard::kpi::CatalogStats;
use crate::models::contact_query::{ContactQuery, NewContactQuery};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::user::{NewUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("conflict: {message}")]
    Conflict {
        constraint: Option<String>,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One published product as listed under its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub category: String,
    pub name: String,
    pub slug: String,
}

pub type DynStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
    // ── Products ──

    /// All products, newest first.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>>;

    async fn find_product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Insert a product. A taken slug yields [`StoreError::Conflict`].
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;

    /// Update the product currently at `slug`. Returns `None` when no product
    /// has that slug.
    async fn update_product(
        &self,
        slug: &str,
        changes: ProductChanges,
    ) -> StoreResult<Option<Product>>;

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;

    /// Published products that have a category, ordered by category then name.
    async fn published_category_entries(&self) -> StoreResult<Vec<CategoryEntry>>;

    // ── Users ──

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// All users ordered by email.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Insert a user. A taken email yields [`StoreError::Conflict`].
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    /// Create the user, or replace the password hash of the existing user
    /// with the same email.
    async fn upsert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn delete_user_by_email(&self, email: &str) -> StoreResult<bool>;

    // ── Contact queries ──

    async fn insert_query(&self, query: NewContactQuery) -> StoreResult<ContactQuery>;

    /// All queries, newest first.
    async fn list_queries(&self) -> StoreResult<Vec<ContactQuery>>;

    async fn find_query(&self, id: Uuid) -> StoreResult<Option<ContactQuery>>;

    async fn update_query_status(&self, id: Uuid, status: &str)
        -> StoreResult<Option<ContactQuery>>;

    async fn delete_query(&self, id: Uuid) -> StoreResult<bool>;

    // ── Dashboard ──

    async fn stats(&self) -> StoreResult<CatalogStats>;
}
