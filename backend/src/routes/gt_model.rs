use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::algorithms::RepresentativePolicy;
use crate::api::RecordIndex;
use crate::models::AggregatedCluster;

// =========================================================
// Grade-tonnage model types + route
// =========================================================

/// A deposit-type group in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub name: String,
    pub count: usize,
    /// Mean contained metal per tonne over records with a finite ratio
    pub avg_metal_per_tonnage: Option<f64>,
    pub rank: usize,
    /// Normalized hue in `[0, 1]`, keyed by rank
    pub hue: f64,
    /// Legend label, `"<name> (<count>)"`
    pub label: String,
}

/// Aggregated points of one deposit-type group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositGroupData {
    pub name: String,
    pub hue: f64,
    pub visible: bool,
    /// False for the `"Unknown"` group and for the unaggregated view
    pub aggregated: bool,
    pub record_count: usize,
    pub clusters: Vec<AggregatedCluster>,
}

/// A single sample of a guide curve.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Million tonnes
    pub tonnage: f64,
    /// Percent
    pub grade: f64,
}

/// Line of constant contained metal on the log-log chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideCurve {
    pub metal_content: f64,
    pub label: String,
    pub points: Vec<CurvePoint>,
}

/// Log10 axis ranges of the chart.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    /// Tonnage axis
    pub x_range: [f64; 2],
    /// Grade axis
    pub y_range: [f64; 2],
}

/// Smallest and largest known distance between two sites.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceExtent {
    pub min_km: f64,
    pub max_km: f64,
}

/// Wire form of one distance cache entry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub i: RecordIndex,
    pub j: RecordIndex,
    pub distance_km: f64,
}

/// Complete plot dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtModelData {
    pub title: String,
    pub commodities: Vec<String>,
    /// Commodity code → display name for every code in the records
    pub commodity_names: BTreeMap<String, String>,
    pub proximity_km: f64,
    pub representative: RepresentativePolicy,
    pub ranked_groups: Vec<RankedGroup>,
    pub groups: Vec<DepositGroupData>,
    pub guide_curves: Vec<GuideCurve>,
    pub axis_bounds: Option<AxisBounds>,
    pub distance_extent: Option<DistanceExtent>,
    pub total_records: usize,
    pub total_clusters: usize,
    /// Clusters whose grade is an unweighted mean because their tonnage summed to zero
    pub grade_fallback_count: usize,
}

impl GtModelData {
    /// Groups the caller marked visible, in rank order.
    pub fn visible_groups(&self) -> impl Iterator<Item = &DepositGroupData> {
        self.groups.iter().filter(|g| g.visible)
    }

    pub fn group(&self, name: &str) -> Option<&DepositGroupData> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Route function name constant for the repository-backed model
pub const GET_GT_MODEL_DATA: &str = "get_gt_model_data";
/// Route function name constant for the caller-supplied table model
pub const POST_GT_MODEL_DATA: &str = "compute_gt_model_data";

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, visible: bool) -> DepositGroupData {
        DepositGroupData {
            name: name.to_string(),
            hue: 0.0,
            visible,
            aggregated: false,
            record_count: 0,
            clusters: vec![],
        }
    }

    #[test]
    fn test_visible_groups_filter() {
        let data = GtModelData {
            title: "t".to_string(),
            commodities: vec![],
            commodity_names: BTreeMap::new(),
            proximity_km: 0.0,
            representative: RepresentativePolicy::FirstMember,
            ranked_groups: vec![],
            groups: vec![group("A", true), group("B", false), group("C", true)],
            guide_curves: vec![],
            axis_bounds: None,
            distance_extent: None,
            total_records: 0,
            total_clusters: 0,
            grade_fallback_count: 0,
        };
        let names: Vec<_> = data.visible_groups().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(data.group("B").is_some());
        assert!(data.group("D").is_none());
    }

    #[test]
    fn test_distance_entry_deserialize() {
        let entry: DistanceEntry =
            serde_json::from_str(r#"{"i": 3, "j": 7, "distance_km": 12.5}"#).unwrap();
        assert_eq!(entry.i, RecordIndex(3));
        assert_eq!(entry.j.value(), 7);
        assert_eq!(entry.distance_km, 12.5);
    }

    #[test]
    fn test_const_values() {
        assert_eq!(GET_GT_MODEL_DATA, "get_gt_model_data");
        assert_eq!(POST_GT_MODEL_DATA, "compute_gt_model_data");
    }
}
