//! KPI queries for the admin dashboard.

use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;

use crate::models::contact_query::{ContactQuery, STATUS_NEW};
use crate::models::product::Product;
use crate::services::query_service::{query_kind, QueryKind};

/// Product counts by publication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, QueryableByName)]
pub struct ProductCounts {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub published: i64,
    #[diesel(sql_type = BigInt)]
    pub drafts: i64,
}

/// Lead counts by kind and triage state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, QueryableByName)]
pub struct QueryCounts {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub contact: i64,
    #[diesel(sql_type = BigInt)]
    pub download: i64,
    #[diesel(sql_type = BigInt)]
    #[serde(rename = "new")]
    pub status_new: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub products: ProductCounts,
    pub queries: QueryCounts,
}

pub async fn query_product_counts(conn: &mut AsyncPgConnection) -> anyhow::Result<ProductCounts> {
    let result = diesel::sql_query(
        "SELECT \
            COUNT(*) AS total, \
            COUNT(*) FILTER (WHERE published) AS published, \
            COUNT(*) FILTER (WHERE NOT published) AS drafts \
         FROM products",
    )
    .get_result(conn)
    .await?;
    Ok(result)
}

pub async fn query_query_counts(conn: &mut AsyncPgConnection) -> anyhow::Result<QueryCounts> {
    let result = diesel::sql_query(format!(
        "SELECT \
            COUNT(*) AS total, \
            COUNT(*) FILTER (WHERE subject NOT ILIKE '%download request%') AS contact, \
            COUNT(*) FILTER (WHERE subject ILIKE '%download request%') AS download, \
            COUNT(*) FILTER (WHERE status = '{STATUS_NEW}') AS status_new \
         FROM contact_queries"
    ))
    .get_result(conn)
    .await?;
    Ok(result)
}

/// Same aggregation as the SQL above, over rows already in memory.
pub fn count_products(products: &[Product]) -> ProductCounts {
    let published = products.iter().filter(|p| p.published).count() as i64;
    let total = products.len() as i64;
    ProductCounts {
        total,
        published,
        drafts: total - published,
    }
}

pub fn count_queries(queries: &[ContactQuery]) -> QueryCounts {
    let download = queries
        .iter()
        .filter(|q| query_kind(&q.subject) == QueryKind::Download)
        .count() as i64;
    let total = queries.len() as i64;
    QueryCounts {
        total,
        contact: total - download,
        download,
        status_new: queries.iter().filter(|q| q.status == STATUS_NEW).count() as i64,
    }
}
