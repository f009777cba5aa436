//! Schema migration for the catalog tables.

use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

/// SQL migration for catalog tables.
///
/// Idempotent: every statement is `IF NOT EXISTS`, so it runs on each startup.
pub const MIGRATION_SQL: &str = r#"
-- ================================================================
-- Catalog tables
-- ================================================================

CREATE TABLE IF NOT EXISTS products (
    id                   UUID PRIMARY KEY,
    name                 VARCHAR(255) NOT NULL,
    title                VARCHAR(255) NOT NULL DEFAULT '',
    slug                 VARCHAR(255) NOT NULL UNIQUE,
    description          TEXT NOT NULL,
    category             VARCHAR(255),
    images               TEXT[] NOT NULL DEFAULT '{}',
    why_this_product     TEXT NOT NULL DEFAULT '',
    what_does_it_do      TEXT NOT NULL DEFAULT '',
    features             TEXT[] NOT NULL DEFAULT '{}',
    use_cases            TEXT[] NOT NULL DEFAULT '{}',
    sku                  VARCHAR(255) NOT NULL DEFAULT '',
    vesa                 VARCHAR(255) NOT NULL DEFAULT '',
    max_weight           VARCHAR(255) NOT NULL DEFAULT '',
    screen_size          VARCHAR(255) NOT NULL DEFAULT '',
    adjustments          VARCHAR(255) NOT NULL DEFAULT '',
    technical_drawing    VARCHAR(1024) NOT NULL DEFAULT '',
    installation_manual  VARCHAR(1024) NOT NULL DEFAULT '',
    technical_data_sheet VARCHAR(1024) NOT NULL DEFAULT '',
    brochure             VARCHAR(1024) NOT NULL DEFAULT '',
    material             VARCHAR(255) NOT NULL DEFAULT '',
    certifications       TEXT[] NOT NULL DEFAULT '{}',
    video_url            VARCHAR(1024) NOT NULL DEFAULT '',
    fusion_url           VARCHAR(1024) NOT NULL DEFAULT '',
    application          VARCHAR(512) NOT NULL DEFAULT '',
    compatibility        VARCHAR(512) NOT NULL DEFAULT '',
    finish               VARCHAR(255) NOT NULL DEFAULT '',
    published            BOOLEAN NOT NULL DEFAULT FALSE,
    created_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at           TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_products_created ON products (created_at DESC);
CREATE INDEX IF NOT EXISTS idx_products_category ON products (category, name) WHERE published;

CREATE TABLE IF NOT EXISTS users (
    id              UUID PRIMARY KEY,
    email           VARCHAR(255) NOT NULL UNIQUE,
    name            VARCHAR(255) NOT NULL DEFAULT 'Admin',
    password_hash   VARCHAR(255) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS contact_queries (
    id              UUID PRIMARY KEY,
    first_name      VARCHAR(255) NOT NULL,
    last_name       VARCHAR(255) NOT NULL,
    email           VARCHAR(255) NOT NULL,
    phone_number    VARCHAR(64) NOT NULL DEFAULT '',
    subject         VARCHAR(512) NOT NULL,
    message         TEXT NOT NULL,
    status          VARCHAR(32) NOT NULL DEFAULT 'new',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_contact_queries_created ON contact_queries (created_at DESC);
"#;

/// Run the catalog migration.
pub async fn run_migration(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    conn.batch_execute(MIGRATION_SQL)
        .await
        .map_err(|e| anyhow::anyhow!("catalog migration failed: {e}"))?;
    Ok(())
}
