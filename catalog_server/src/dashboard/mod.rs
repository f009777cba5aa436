//! Admin dashboard aggregates.

pub mod kpi;
