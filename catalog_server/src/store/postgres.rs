//! Postgres store: diesel queries over a deadpool of async connections.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use super::{CategoryEntry, Store, StoreError, StoreResult};
use crate::dashboard::kpi::{self, CatalogStats};
use crate::models::contact_query::{ContactQuery, NewContactQuery};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::user::{NewUser, User};
use crate::schema::{contact_queries, products, users};

pub type DbPool = Pool<AsyncPgConnection>;

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Conflict {
                    constraint: info.constraint_name().map(str::to_string),
                    message: info.message().to_string(),
                }
            }
            other => StoreError::Other(other.into()),
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Build the connection pool. Connections are opened lazily.
    pub fn connect(database_url: &str, max_size: usize) -> anyhow::Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager).max_size(max_size).build()?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("diesel pool: {e}"))?;
        tracing::info!("Running database migrations...");
        crate::migration::run_migration(&mut conn).await?;
        tracing::info!("Database migrations completed.");
        Ok(())
    }

    async fn conn(&self) -> StoreResult<Object<AsyncPgConnection>> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Other(anyhow::anyhow!("diesel pool: {e}")))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let mut conn = self.conn().await?;
        let rows = products::table
            .order(products::created_at.desc())
            .select(Product::as_select())
            .load(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let mut conn = self.conn().await?;
        let row = products::table
            .filter(products::slug.eq(slug))
            .select(Product::as_select())
            .first(&mut *conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn find_product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let mut conn = self.conn().await?;
        let row = products::table
            .find(id)
            .select(Product::as_select())
            .first(&mut *conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut conn = self.conn().await?;
        let row = diesel::insert_into(products::table)
            .values(&product)
            .returning(Product::as_returning())
            .get_result(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn update_product(
        &self,
        slug: &str,
        changes: ProductChanges,
    ) -> StoreResult<Option<Product>> {
        let mut conn = self.conn().await?;
        let row = diesel::update(products::table.filter(products::slug.eq(slug)))
            .set(&changes)
            .returning(Product::as_returning())
            .get_result(&mut *conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(products::table.find(id))
            .execute(&mut *conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn published_category_entries(&self) -> StoreResult<Vec<CategoryEntry>> {
        let mut conn = self.conn().await?;
        let rows: Vec<(Option<String>, String, String)> = products::table
            .filter(products::published.eq(true))
            .filter(products::category.is_not_null())
            .order((products::category.asc(), products::name.asc()))
            .select((products::category, products::name, products::slug))
            .load(&mut *conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(category, name, slug)| {
                category.map(|category| CategoryEntry {
                    category,
                    name,
                    slug,
                })
            })
            .collect())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut *conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut conn = self.conn().await?;
        let rows = users::table
            .order(users::email.asc())
            .select(User::as_select())
            .load(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn().await?;
        let row = diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn upsert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn().await?;
        let row = diesel::insert_into(users::table)
            .values(&user)
            .on_conflict(users::email)
            .do_update()
            .set(users::password_hash.eq(excluded(users::password_hash)))
            .returning(User::as_returning())
            .get_result(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn delete_user_by_email(&self, email: &str) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(users::table.filter(users::email.eq(email)))
            .execute(&mut *conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn insert_query(&self, query: NewContactQuery) -> StoreResult<ContactQuery> {
        let mut conn = self.conn().await?;
        let row = diesel::insert_into(contact_queries::table)
            .values(&query)
            .returning(ContactQuery::as_returning())
            .get_result(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn list_queries(&self) -> StoreResult<Vec<ContactQuery>> {
        let mut conn = self.conn().await?;
        let rows = contact_queries::table
            .order(contact_queries::created_at.desc())
            .select(ContactQuery::as_select())
            .load(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn find_query(&self, id: Uuid) -> StoreResult<Option<ContactQuery>> {
        let mut conn = self.conn().await?;
        let row = contact_queries::table
            .find(id)
            .select(ContactQuery::as_select())
            .first(&mut *conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn update_query_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> StoreResult<Option<ContactQuery>> {
        let mut conn = self.conn().await?;
        let row = diesel::update(contact_queries::table.find(id))
            .set(contact_queries::status.eq(status))
            .returning(ContactQuery::as_returning())
            .get_result(&mut *conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn delete_query(&self, id: Uuid) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(contact_queries::table.find(id))
            .execute(&mut *conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn stats(&self) -> StoreResult<CatalogStats> {
        let mut conn = self.conn().await?;
        let products = kpi::query_product_counts(&mut conn).await?;
        let queries = kpi::query_query_counts(&mut conn).await?;
        Ok(CatalogStats { products, queries })
    }
}
