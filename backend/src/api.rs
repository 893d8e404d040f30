//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::AggregatedCluster;
pub use crate::models::DepositRecord;
pub use crate::models::DistanceCache;
pub use crate::models::UNKNOWN_DEPOSIT_TYPE;
pub use crate::routes::export::ExportRow;
pub use crate::routes::gt_model::AxisBounds;
pub use crate::routes::gt_model::CurvePoint;
pub use crate::routes::gt_model::DepositGroupData;
pub use crate::routes::gt_model::DistanceEntry;
pub use crate::routes::gt_model::DistanceExtent;
pub use crate::routes::gt_model::GtModelData;
pub use crate::routes::gt_model::GuideCurve;
pub use crate::routes::gt_model::RankedGroup;
pub use crate::routes::landing::CommodityInfo;

use serde::{Deserialize, Serialize};

/// Stable key of a deposit record; also the key of the distance cache.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordIndex(pub usize);

impl RecordIndex {
    pub fn new(value: usize) -> Self {
        RecordIndex(value)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RecordIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for RecordIndex {
    fn from(value: usize) -> Self {
        RecordIndex(value)
    }
}

impl From<RecordIndex> for usize {
    fn from(index: RecordIndex) -> Self {
        index.0
    }
}
