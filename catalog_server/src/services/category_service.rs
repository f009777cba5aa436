//! Navbar grouping of published products by category.

use serde::Serialize;

use crate::errors::Result;
use crate::store::{CategoryEntry, Store};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductLink {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub products: Vec<ProductLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub categories: Vec<CategoryGroup>,
    pub count: usize,
}

/// Group entries that arrive ordered by category, keeping first-seen order.
pub fn group_by_category(entries: Vec<CategoryEntry>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for entry in entries {
        let link = ProductLink {
            name: entry.name,
            slug: entry.slug,
        };
        match groups.iter_mut().find(|g| g.category == entry.category) {
            Some(group) => group.products.push(link),
            None => groups.push(CategoryGroup {
                category: entry.category,
                products: vec![link],
            }),
        }
    }
    groups
}

pub async fn list_categories(store: &dyn Store) -> Result<CategoryListing> {
    let entries = store.published_category_entries().await?;
    let categories = group_by_category(entries);
    Ok(CategoryListing {
        count: categories.len(),
        categories,
    })
}
