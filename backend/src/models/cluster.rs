// =========================================================
// Aggregated clusters
// =========================================================

use serde::{Deserialize, Serialize};

use crate::api::RecordIndex;
use crate::models::DepositRecord;

/// Separator of the concatenated site name/identifier fields.
pub const MEMBER_SEPARATOR: &str = "::";

/// One plotted point: one or more records of a deposit-type group merged into a
/// single weighted-average row.
///
/// `members` is the authoritative membership, in cluster-build order. The
/// `ms_name` and `ms` strings are display labels derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCluster {
    pub members: Vec<RecordIndex>,
    pub site_names: Vec<String>,
    pub site_ids: Vec<String>,
    /// Tonnage-weighted grade in percent
    pub total_grade: Option<f64>,
    /// Summed tonnage in million tonnes
    pub total_tonnage: Option<f64>,
    pub ms_name: String,
    pub ms: String,
    pub commodity: String,
    pub top1_deposit_name: String,
    pub lat: Option<qtty::Degrees>,
    pub lon: Option<qtty::Degrees>,
    /// Set when the tonnage weights summed to zero and `total_grade` is an
    /// unweighted mean instead.
    pub grade_fallback: bool,
}

/// Joins member labels: single members stay bare, multi-member clusters carry a
/// leading separator (`"::a::b"`).
pub fn join_member_labels(labels: &[String]) -> String {
    let joined = labels.join(MEMBER_SEPARATOR);
    if labels.len() > 1 {
        format!("{}{}", MEMBER_SEPARATOR, joined)
    } else {
        joined
    }
}

/// Tonnage-weighted grade over `members`.
///
/// Returns the grade and whether the unweighted fallback was used.
pub(crate) fn weighted_grade(members: &[&DepositRecord]) -> (Option<f64>, bool) {
    let mut weight = 0.0;
    let mut weighted_sum = 0.0;
    let mut paired = 0usize;
    for record in members {
        if let (Some(grade), Some(tonnage)) = (record.total_grade, record.total_tonnage) {
            weight += tonnage;
            weighted_sum += grade * tonnage;
            paired += 1;
        }
    }

    if paired > 0 && weight != 0.0 {
        return (Some(weighted_sum / weight), false);
    }

    let grades: Vec<f64> = members.iter().filter_map(|r| r.total_grade).collect();
    if grades.is_empty() {
        return (None, false);
    }
    let mean = grades.iter().sum::<f64>() / grades.len() as f64;
    (Some(mean), paired > 0)
}

/// Sum of the tonnages that are present; `None` when no member has one.
pub(crate) fn total_tonnage(members: &[&DepositRecord]) -> Option<f64> {
    members
        .iter()
        .filter_map(|r| r.total_tonnage)
        .fold(None, |acc, t| Some(acc.unwrap_or(0.0) + t))
}

impl AggregatedCluster {
    /// Single-record cluster, as produced by the unaggregated view.
    pub fn singleton(record: &DepositRecord) -> Self {
        Self {
            members: vec![record.index],
            site_names: vec![record.ms_name.clone()],
            site_ids: vec![record.ms.clone()],
            total_grade: record.total_grade,
            total_tonnage: record.total_tonnage,
            ms_name: record.ms_name.clone(),
            ms: record.ms.clone(),
            commodity: record.commodity.clone(),
            top1_deposit_name: record.top1_deposit_name.clone(),
            lat: record.lat,
            lon: record.lon,
            grade_fallback: false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_merged(&self) -> bool {
        self.members.len() > 1
    }
}
