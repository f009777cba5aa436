//! products: a catalog entry, addressed publicly by its slug.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::products;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = products)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub why_this_product: String,
    pub what_does_it_do: String,
    pub features: Vec<String>,
    pub use_cases: Vec<String>,
    pub sku: String,
    pub vesa: String,
    pub max_weight: String,
    pub screen_size: String,
    pub adjustments: String,
    pub technical_drawing: String,
    pub installation_manual: String,
    pub technical_data_sheet: String,
    pub brochure: String,
    pub material: String,
    pub certifications: Vec<String>,
    pub video_url: String,
    pub fusion_url: String,
    pub application: String,
    pub compatibility: String,
    pub finish: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub why_this_product: String,
    pub what_does_it_do: String,
    pub features: Vec<String>,
    pub use_cases: Vec<String>,
    pub sku: String,
    pub vesa: String,
    pub max_weight: String,
    pub screen_size: String,
    pub adjustments: String,
    pub technical_drawing: String,
    pub installation_manual: String,
    pub technical_data_sheet: String,
    pub brochure: String,
    pub material: String,
    pub certifications: Vec<String>,
    pub video_url: String,
    pub fusion_url: String,
    pub application: String,
    pub compatibility: String,
    pub finish: String,
    pub published: bool,
}

impl NewProduct {
    /// Materialize the row a store would return after inserting `self`.
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            title: self.title,
            slug: self.slug,
            description: self.description,
            category: self.category,
            images: self.images,
            why_this_product: self.why_this_product,
            what_does_it_do: self.what_does_it_do,
            features: self.features,
            use_cases: self.use_cases,
            sku: self.sku,
            vesa: self.vesa,
            max_weight: self.max_weight,
            screen_size: self.screen_size,
            adjustments: self.adjustments,
            technical_drawing: self.technical_drawing,
            installation_manual: self.installation_manual,
            technical_data_sheet: self.technical_data_sheet,
            brochure: self.brochure,
            material: self.material,
            certifications: self.certifications,
            video_url: self.video_url,
            fusion_url: self.fusion_url,
            application: self.application,
            compatibility: self.compatibility,
            finish: self.finish,
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub why_this_product: Option<String>,
    pub what_does_it_do: Option<String>,
    pub features: Option<Vec<String>>,
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
    pub published: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl ProductChanges {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            title: None,
            slug: None,
            description: None,
            category: None,
            images: None,
            why_this_product: None,
            what_does_it_do: None,
            features: None,
            use_cases: None,
            sku: None,
            vesa: None,
            max_weight: None,
            screen_size: None,
            adjustments: None,
            technical_drawing: None,
            installation_manual: None,
            technical_data_sheet: None,
            brochure: None,
            material: None,
            certifications: None,
            video_url: None,
            fusion_url: None,
            application: None,
            compatibility: None,
            finish: None,
            published: None,
            updated_at,
        }
    }

    /// Apply the changes to an in-memory row.
    pub fn apply_to(self, product: &mut Product) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    product.$field = value;
                })*
            };
        }

        set!(
            name,
            title,
            slug,
            description,
            category,
            images,
            why_this_product,
            what_does_it_do,
            features,
            use_cases,
            sku,
            vesa,
            max_weight,
            screen_size,
            adjustments,
            technical_drawing,
            installation_manual,
            technical_data_sheet,
            brochure,
            material,
            certifications,
            video_url,
            fusion_url,
            application,
            compatibility,
            finish,
            published,
        );
        product.updated_at = self.updated_at;
    }
}
