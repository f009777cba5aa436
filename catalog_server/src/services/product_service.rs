//! Product CRUD: payload validation, slug rules, and upload cleanup on delete.

use std::path::Path;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ApiError, Result};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::{fits_column, LINK_MAX_LEN, NAME_MAX_LEN, SUBJECT_MAX_LEN};
use crate::store::{Store, StoreError};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"--+").unwrap());

/// Turn free text into a URL slug: `"Swivel  Mount!"` -> `"swivel-mount"`.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let text = WHITESPACE.replace_all(lower.trim(), "-");
    let text = NON_SLUG.replace_all(&text, "");
    DASHES.replace_all(&text, "-").into_owned()
}

/// Whether `slug` is already in the form [`slugify`] produces.
pub fn is_canonical_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

/// A feature entry as sent by the admin editor: either plain text or a
/// `{ "value": ... }` row from a field array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureItem {
    Text(String),
    Row { value: Option<String> },
}

fn flatten_features(items: Vec<FeatureItem>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            FeatureItem::Text(text) => Some(text),
            FeatureItem::Row { value } => value,
        })
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Product body for create and update. Unknown keys, including the
/// system fields `id`, `createdAt` and `updatedAt`, are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub why_this_product: Option<String>,
    pub what_does_it_do: Option<String>,
    pub features: Option<Vec<FeatureItem>>,
    pub use_cases: Option<Vec<String>>,
    pub sku: Option<String>,
    pub vesa: Option<String>,
    pub max_weight: Option<String>,
    pub screen_size: Option<String>,
    pub adjustments: Option<String>,
    pub technical_drawing: Option<String>,
    pub installation_manual: Option<String>,
    pub technical_data_sheet: Option<String>,
    pub brochure: Option<String>,
    pub material: Option<String>,
    pub certifications: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub fusion_url: Option<String>,
    pub application: Option<String>,
    pub compatibility: Option<String>,
    pub finish: Option<String>,
    pub published: Option<serde_json::Value>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_slug(slug: &str) -> Result<()> {
    if is_canonical_slug(slug) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("Invalid slug: {slug}")))
    }
}

fn slug_taken(slug: &str) -> ApiError {
    ApiError::bad_request(format!("Slug already exists: {slug}"))
}

impl ProductPayload {
    /// Reject values wider than their column.
    fn check_lengths(&self) -> Result<()> {
        let fields = [
            ("name", &self.name, NAME_MAX_LEN),
            ("title", &self.title, NAME_MAX_LEN),
            ("slug", &self.slug, NAME_MAX_LEN),
            ("category", &self.category, NAME_MAX_LEN),
            ("sku", &self.sku, NAME_MAX_LEN),
            ("vesa", &self.vesa, NAME_MAX_LEN),
            ("maxWeight", &self.max_weight, NAME_MAX_LEN),
            ("screenSize", &self.screen_size, NAME_MAX_LEN),
            ("adjustments", &self.adjustments, NAME_MAX_LEN),
            ("material", &self.material, NAME_MAX_LEN),
            ("finish", &self.finish, NAME_MAX_LEN),
            ("application", &self.application, SUBJECT_MAX_LEN),
            ("compatibility", &self.compatibility, SUBJECT_MAX_LEN),
            ("technicalDrawing", &self.technical_drawing, LINK_MAX_LEN),
            ("installationManual", &self.installation_manual, LINK_MAX_LEN),
            ("technicalDataSheet", &self.technical_data_sheet, LINK_MAX_LEN),
            ("brochure", &self.brochure, LINK_MAX_LEN),
            ("videoUrl", &self.video_url, LINK_MAX_LEN),
            ("fusionUrl", &self.fusion_url, LINK_MAX_LEN),
        ];
        for (field, value, max) in fields {
            if value.as_deref().is_some_and(|v| !fits_column(v, max)) {
                return Err(ApiError::bad_request(format!(
                    "Product {field} must be at most {max} characters"
                )));
            }
        }
        Ok(())
    }

    /// Validate a create request and fill in defaults.
    pub fn into_new_product(self) -> Result<NewProduct> {
        self.check_lengths()?;
        let (Some(name), Some(slug), Some(description)) = (
            non_blank(self.name),
            non_blank(self.slug),
            non_blank(self.description),
        ) else {
            return Err(ApiError::bad_request(
                "Missing required fields: name, slug, and description are mandatory",
            ));
        };
        check_slug(&slug)?;

        Ok(NewProduct {
            id: Uuid::new_v4(),
            title: non_blank(self.title).unwrap_or_else(|| name.clone()),
            name,
            slug,
            description,
            category: Some(non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            images: self.images.unwrap_or_default(),
            why_this_product: self.why_this_product.unwrap_or_default(),
            what_does_it_do: self.what_does_it_do.unwrap_or_default(),
            features: self.features.map(flatten_features).unwrap_or_default(),
            use_cases: self.use_cases.unwrap_or_default(),
            sku: self.sku.unwrap_or_default(),
            vesa: self.vesa.unwrap_or_default(),
            max_weight: self.max_weight.unwrap_or_default(),
            screen_size: self.screen_size.unwrap_or_default(),
            adjustments: self.adjustments.unwrap_or_default(),
            technical_drawing: self.technical_drawing.unwrap_or_default(),
            installation_manual: self.installation_manual.unwrap_or_default(),
            technical_data_sheet: self.technical_data_sheet.unwrap_or_default(),
            brochure: self.brochure.unwrap_or_default(),
            material: self.material.unwrap_or_default(),
            certifications: self.certifications.unwrap_or_default(),
            video_url: self.video_url.unwrap_or_default(),
            fusion_url: self.fusion_url.unwrap_or_default(),
            application: self.application.unwrap_or_default(),
            compatibility: self.compatibility.unwrap_or_default(),
            finish: self.finish.unwrap_or_default(),
            published: self.published == Some(serde_json::Value::Bool(true)),
        })
    }

    /// Validate an update request. Absent keys leave columns untouched.
    pub fn into_changes(self) -> Result<ProductChanges> {
        self.check_lengths()?;
        let mut changes = ProductChanges::new(Utc::now());

        if let Some(slug) = self.slug {
            check_slug(&slug)?;
            changes.slug = Some(slug);
        }
        for (field, value) in [("name", &self.name), ("description", &self.description)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ApiError::bad_request(format!("Product {field} cannot be empty")));
            }
        }
        changes.published = match self.published {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Bool(b)) => Some(b),
            Some(_) => return Err(ApiError::bad_request("published must be a boolean")),
        };

        changes.name = self.name;
        changes.title = self.title;
        changes.description = self.description;
        changes.category = self.category.map(|c| non_blank(Some(c)));
        changes.images = self.images;
        changes.why_this_product = self.why_this_product;
        changes.what_does_it_do = self.what_does_it_do;
        changes.features = self.features.map(flatten_features);
        changes.use_cases = self.use_cases;
        changes.sku = self.sku;
        changes.vesa = self.vesa;
        changes.max_weight = self.max_weight;
        changes.screen_size = self.screen_size;
        changes.adjustments = self.adjustments;
        changes.technical_drawing = self.technical_drawing;
        changes.installation_manual = self.installation_manual;
        changes.technical_data_sheet = self.technical_data_sheet;
        changes.brochure = self.brochure;
        changes.material = self.material;
        changes.certifications = self.certifications;
        changes.video_url = self.video_url;
        changes.fusion_url = self.fusion_url;
        changes.application = self.application;
        changes.compatibility = self.compatibility;
        changes.finish = self.finish;
        Ok(changes)
    }
}

/// Optional filters for the product listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub published: Option<bool>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => product
                .category
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(wanted)),
        };
        category_ok && self.published.is_none_or(|p| product.published == p)
    }
}

pub async fn list_products(store: &dyn Store, filter: &ProductFilter) -> Result<Vec<Product>> {
    let mut products = store.list_products().await?;
    products.retain(|p| filter.matches(p));
    Ok(products)
}

pub async fn get_product(store: &dyn Store, slug: &str) -> Result<Product> {
    store
        .find_product_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

pub async fn create_product(store: &dyn Store, payload: ProductPayload) -> Result<Product> {
    let new_product = payload.into_new_product()?;
    if store.find_product_by_slug(&new_product.slug).await?.is_some() {
        return Err(slug_taken(&new_product.slug));
    }

    let slug = new_product.slug.clone();
    match store.insert_product(new_product).await {
        Ok(product) => {
            tracing::info!(slug = %product.slug, id = %product.id, "Product created");
            Ok(product)
        }
        Err(StoreError::Conflict { .. }) => Err(slug_taken(&slug)),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_product(store: &dyn Store, slug: &str, payload: ProductPayload) -> Result<Product> {
    let changes = payload.into_changes()?;
    let new_slug = changes.slug.clone();

    match store.update_product(slug, changes).await {
        Ok(Some(product)) => {
            tracing::info!(slug = %product.slug, "Product updated");
            Ok(product)
        }
        Ok(None) => Err(ApiError::not_found("Product not found")),
        Err(StoreError::Conflict { .. }) => Err(slug_taken(new_slug.as_deref().unwrap_or(slug))),
        Err(e) => Err(e.into()),
    }
}

/// Delete a product addressed by id or, failing that, by slug. Its image
/// files are removed from `upload_dir` only once the row is gone.
pub async fn delete_product(store: &dyn Store, upload_dir: &Path, key: &str) -> Result<Product> {
    let by_id = match Uuid::parse_str(key) {
        Ok(id) => store.find_product_by_id(id).await?,
        Err(_) => None,
    };
    let product = match by_id {
        Some(product) => product,
        None => store
            .find_product_by_slug(key)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))?,
    };

    if !store.delete_product(product.id).await? {
        return Err(ApiError::not_found("Product not found"));
    }

    for filename in image_filenames(&product.images) {
        let path = upload_dir.join(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::info!(file = %path.display(), "Image file not removed: {e}");
        }
    }
    tracing::info!(slug = %product.slug, id = %product.id, "Product deleted");
    Ok(product)
}

/// Last path segment of each image URL, when it is a plain file name.
fn image_filenames(images: &[String]) -> impl Iterator<Item = &str> {
    images.iter().filter_map(|url| {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let name = path.rsplit('/').next()?;
        let plain = !name.is_empty() && name != "." && name != ".." && !name.contains('\\');
        plain.then_some(name)
    })
}
