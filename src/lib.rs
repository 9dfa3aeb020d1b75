//! `agriflow`: cloud ingestion and analytics for agricultural sensor nodes.
//!
//! Field nodes post readings to `POST /sensor-data`; dashboards fetch
//! `GET /sensor-data`, which runs the [`analytics`] engine over a window
//! loaded from the [`store`] and returns a [`report::DashboardReport`].
//!
//! The binary in `main.rs` only wires configuration, logging, the database
//! pool, and the [`routes`] gateway together.

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod routes;
pub mod schema;
pub mod store;

pub use config::Config;
pub use models::{IngestPayload, Reading};
