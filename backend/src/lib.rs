//! # GTM Rust Backend
//!
//! Grade-tonnage model engine for mineral deposits.
//!
//! The crate turns a table of mineral-site records (tonnage, grade, contained
//! metal, deposit type, coordinates) into the dataset behind a log-log
//! grade-tonnage chart: proximity-aggregated clusters per deposit type,
//! ranked groups with display hues, iso-metal guide curves and axis bounds.
//! The same dataset can be exported as CSV.
//!
//! ## Architecture
//!
//! - [`models`]: Deposit records, distance cache, aggregated clusters, reference tables
//! - [`algorithms`]: Proximity aggregation, group ranking, chart geometry, geodesy
//! - [`parsing`]: Row tables and raw mineral-site documents to records
//! - [`services`]: Commodity selection, model building and CSV export
//! - [`db`]: Repository pattern over the mineral-site data source
//! - [`routes`]: Route-specific data types returned to the front end
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: TOML and environment configuration
//!
//! ## Example
//!
//! ```
//! use gtm_rust::algorithms::ProximityThreshold;
//! use gtm_rust::parsing::parse_table_json;
//! use gtm_rust::models::DistanceCache;
//! use gtm_rust::services::{GradeTonnageDataset, GtModelRequest};
//!
//! let records = parse_table_json(r#"[
//!     {"ms": "/derived/a", "ms_name": "A", "commodity": "Q578",
//!      "top1_deposit_name": "Porphyry copper", "lat": 1.0, "lon": 2.0,
//!      "total_grade": 0.5, "total_tonnage": 100.0, "total_contained_metal": 0.5}
//! ]"#).unwrap();
//! let distances = DistanceCache::from_records(&records);
//! let data = GradeTonnageDataset::new(records, distances, vec!["copper".into()])
//!     .unwrap()
//!     .build(&GtModelRequest {
//!         proximity: ProximityThreshold::new(5.0).unwrap(),
//!         ..Default::default()
//!     });
//! assert_eq!(data.total_clusters, 1);
//! ```

// RepositoryError carries a context map for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;

pub mod db;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{GtModelError, GtModelResult};
