//! Catalog Server: product catalog, lead capture and admin back-office API.
//!
//! The public site reads products, categories and the paginated catalog, and
//! posts contact and download-gate leads. The admin panel manages products,
//! uploads media, triages leads and manages admin accounts behind a session
//! cookie. Persistence sits behind [`store::Store`], with a Postgres backend
//! for production and an in-memory backend for demos and tests.

pub mod auth;
pub mod config;
pub mod cors;
pub mod dashboard;
pub mod errors;
pub mod extract;
pub mod metrics;
pub mod migration;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seeder;
pub mod services;
pub mod store;

#[cfg(test)]
mod test_utils;
