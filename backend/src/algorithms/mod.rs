//! Core algorithms of the grade-tonnage model.
//!
//! This module provides the computational pieces that turn a table of deposit
//! records into plotted points:
//! - Proximity aggregation of records within a deposit-type group
//! - Ranking of deposit-type groups for display order
//! - Chart axis bounds and iso-metal guide curves
//! - Great-circle distances between sites

pub mod aggregation;
pub mod geodesy;
pub mod geometry;
pub mod ranking;

#[cfg(test)]
mod aggregation_tests;

pub use aggregation::{GreedyAggregator, ProximityThreshold, RepresentativePolicy};
pub use geodesy::{haversine_distance, EARTH_MEAN_RADIUS_KM};
pub use geometry::{ChartGeometryBuilder, GuideCurveSettings};
pub use ranking::DepositGroupRanker;
