// =========================================================
// Deposit records
// =========================================================

use serde::{Deserialize, Serialize};

use crate::api::RecordIndex;

/// Deposit-type name given to records whose grade or tonnage is missing.
pub const UNKNOWN_DEPOSIT_TYPE: &str = "Unknown";

/// Derived grade/tonnage statistics of one mineral site.
///
/// Records are built once per request from the source table and are read-only
/// afterwards. `index` is the key used by [`crate::models::DistanceCache`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub index: RecordIndex,
    /// Site identifier (URL suffix)
    pub ms: String,
    /// Site display name
    pub ms_name: String,
    /// Commodity code, resolvable through the commodity dictionary
    pub commodity: String,
    pub top1_deposit_name: String,
    pub lat: Option<qtty::Degrees>,
    pub lon: Option<qtty::Degrees>,
    /// Total grade in percent
    pub total_grade: Option<f64>,
    /// Total tonnage in million tonnes
    pub total_tonnage: Option<f64>,
    pub total_contained_metal: Option<f64>,
}

impl DepositRecord {
    /// Whether this record belongs to the `"Unknown"` deposit-type group.
    pub fn is_unknown(&self) -> bool {
        self.top1_deposit_name == UNKNOWN_DEPOSIT_TYPE
    }

    /// Latitude/longitude pair, when both are known.
    pub fn coordinates(&self) -> Option<(qtty::Degrees, qtty::Degrees)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Contained metal per tonne of ore, when it is a finite number.
    pub fn metal_per_tonnage(&self) -> Option<f64> {
        let ratio = self.total_contained_metal? / self.total_tonnage?;
        ratio.is_finite().then_some(ratio)
    }

    /// Applies the `"Unknown"` rule: a record without a usable grade or tonnage
    /// cannot be plotted, so it is moved to the `"Unknown"` group.
    pub fn normalize_deposit_type(&mut self) {
        if !has_measure(self.total_grade) || !has_measure(self.total_tonnage) {
            self.top1_deposit_name = UNKNOWN_DEPOSIT_TYPE.to_string();
        }
    }
}

/// Zero counts as missing, as in the source data service.
fn has_measure(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && !v.is_nan())
}
