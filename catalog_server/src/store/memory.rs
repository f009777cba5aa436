//! In-process store used for demo mode and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryEntry, Store, StoreError, StoreResult};
use crate::dashboard::kpi::{self, CatalogStats};
use crate::models::contact_query::{ContactQuery, NewContactQuery};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::user::{NewUser, User};

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    users: Vec<User>,
    queries: Vec<ContactQuery>,
}

/// Rows are kept in insertion order; listings sort on the way out.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(constraint: &str, message: String) -> StoreError {
    StoreError::Conflict {
        constraint: Some(constraint.to_string()),
        message,
    }
}

/// Newest first; on equal timestamps the later insert wins.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.products, |p| p.created_at))
    }

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn find_product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut state = self.state.write().await;
        if state.products.iter().any(|p| p.slug == product.slug) {
            return Err(conflict(
                "products_slug_key",
                format!("slug {} already exists", product.slug),
            ));
        }
        let product = product.into_product(Utc::now());
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        slug: &str,
        changes: ProductChanges,
    ) -> StoreResult<Option<Product>> {
        let mut state = self.state.write().await;

        if let Some(new_slug) = changes.slug.as_deref() {
            if new_slug != slug && state.products.iter().any(|p| p.slug == new_slug) {
                return Err(conflict(
                    "products_slug_key",
                    format!("slug {new_slug} already exists"),
                ));
            }
        }

        let Some(product) = state.products.iter_mut().find(|p| p.slug == slug) else {
            return Ok(None);
        };
        changes.apply_to(product);
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        Ok(state.products.len() != before)
    }

    async fn published_category_entries(&self) -> StoreResult<Vec<CategoryEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<CategoryEntry> = state
            .products
            .iter()
            .filter(|p| p.published)
            .filter_map(|p| {
                p.category.as_ref().map(|category| CategoryEntry {
                    category: category.clone(),
                    name: p.name.clone(),
                    slug: p.slug.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(entries)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users = state.users.clone();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(conflict(
                "users_email_key",
                format!("email {} already exists", user.email),
            ));
        }
        let user = user.into_user(Utc::now());
        state.users.push(user.clone());
        Ok(user)
    }

    async fn upsert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.users.iter_mut().find(|u| u.email == user.email) {
            existing.password_hash = user.password_hash;
            return Ok(existing.clone());
        }
        let user = user.into_user(Utc::now());
        state.users.push(user.clone());
        Ok(user)
    }

    async fn delete_user_by_email(&self, email: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.email != email);
        Ok(state.users.len() != before)
    }

    async fn insert_query(&self, query: NewContactQuery) -> StoreResult<ContactQuery> {
        let mut state = self.state.write().await;
        let query = query.into_query(Utc::now());
        state.queries.push(query.clone());
        Ok(query)
    }

    async fn list_queries(&self) -> StoreResult<Vec<ContactQuery>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.queries, |q| q.created_at))
    }

    async fn find_query(&self, id: Uuid) -> StoreResult<Option<ContactQuery>> {
        let state = self.state.read().await;
        Ok(state.queries.iter().find(|q| q.id == id).cloned())
    }

    async fn update_query_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> StoreResult<Option<ContactQuery>> {
        let mut state = self.state.write().await;
        let Some(query) = state.queries.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        query.status = status.to_string();
        Ok(Some(query.clone()))
    }

    async fn delete_query(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.queries.len();
        state.queries.retain(|q| q.id != id);
        Ok(state.queries.len() != before)
    }

    async fn stats(&self) -> StoreResult<CatalogStats> {
        let state = self.state.read().await;
        Ok(CatalogStats {
            products: kpi::count_products(&state.products),
            queries: kpi::count_queries(&state.queries),
        })
    }
}
