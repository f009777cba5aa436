//! Catalog data models.

pub mod contact_query;
pub mod product;
pub mod user;

/// Widest `VARCHAR` columns in the migration, in characters.
pub const NAME_MAX_LEN: usize = 255;
pub const PHONE_MAX_LEN: usize = 64;
pub const SUBJECT_MAX_LEN: usize = 512;
pub const LINK_MAX_LEN: usize = 1024;

/// Whether `value` fits a `VARCHAR(max)` column.
pub fn fits_column(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}
