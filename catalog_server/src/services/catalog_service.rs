//! Public catalog listing: published products with category/search filters.

use serde::Deserialize;

use crate::errors::Result;
use crate::models::product::Product;
use crate::services::pagination::{paginate, Page, PageRequest};
use crate::store::Store;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl CatalogQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

fn before_ampersand(text: &str) -> &str {
    text.split('&').next().unwrap_or_default().trim()
}

/// Loose category match used by the storefront: exact after normalizing, or
/// either side contains the other's leading `&`-separated part.
pub fn category_matches(product_category: Option<&str>, selected: &str) -> bool {
    let selected = selected.trim();
    if selected.is_empty() || selected == ALL_CATEGORIES {
        return true;
    }
    let Some(product_category) = product_category.map(|c| c.trim().to_lowercase()) else {
        return false;
    };
    if product_category.is_empty() {
        return false;
    }
    let selected = selected.to_lowercase();

    product_category == selected
        || product_category.contains(before_ampersand(&selected))
        || selected.contains(before_ampersand(&product_category))
}

/// Case-insensitive substring match on the name, falling back to the title.
pub fn search_matches(product: &Product, search: &str) -> bool {
    let label = if product.name.is_empty() {
        &product.title
    } else {
        &product.name
    };
    label.to_lowercase().contains(&search.trim().to_lowercase())
}

pub async fn browse(store: &dyn Store, query: &CatalogQuery) -> Result<Page<Product>> {
    let category = query.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let search = query.search.as_deref().unwrap_or_default();

    let mut products = store.list_products().await?;
    products.retain(|p| {
        p.published && category_matches(p.category.as_deref(), category) && search_matches(p, search)
    });
    Ok(paginate(products, query.page_request()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::sample_new_product;

    #[test]
    fn fuzzy_category_rules() {
        assert!(category_matches(Some("Mounts"), ALL_CATEGORIES));
        assert!(category_matches(Some(" mounts "), "Mounts"));
        assert!(category_matches(Some("Wall Mounts"), "Mounts & Brackets"));
        assert!(category_matches(Some("Mounts & Arms"), "Desk Mounts & Arms"));
        assert!(!category_matches(Some("Cables"), "Mounts"));
        assert!(!category_matches(None, "Mounts"));
    }

    #[tokio::test]
    async fn browse_filters_and_paginates() {
        let store = MemoryStore::new();
        for i in 0..12 {
            let mut p = sample_new_product(&format!("arm-{i}"));
            p.name = format!("Monitor Arm {i}");
            store.insert_product(p).await.unwrap();
        }
        let mut draft = sample_new_product("hidden-arm");
        draft.name = "Hidden Arm".to_string();
        draft.published = false;
        store.insert_product(draft).await.unwrap();
        let mut cable = sample_new_product("cable");
        cable.category = Some("Cables".to_string());
        store.insert_product(cable).await.unwrap();

        let query = CatalogQuery {
            category: Some("Mounts".to_string()),
            search: Some("ARM".to_string()),
            page: Some(2),
            per_page: None,
        };
        let page = browse(&store, &query).await.unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 2);
    }
}
