//! Ingest of deduplicated mineral-site documents.
//!
//! A site document lists candidate deposit types with confidences and one or
//! more grade/tonnage summaries. The site is reduced to a single
//! [`DepositRecord`] using its most confident deposit type and its first
//! grade/tonnage summary.

use serde::{Deserialize, Serialize};

use crate::api::RecordIndex;
use crate::models::{DepositRecord, ReferenceTables};

/// Prefix of the `ms` identifier of derived sites.
pub const DERIVED_SITE_PREFIX: &str = "/derived";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub country: Vec<String>,
    #[serde(default)]
    pub state_or_province: Vec<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// A deposit-type candidate; `id` is a key of the deposit-type dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDepositType {
    pub id: String,
    pub confidence: f64,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGradeTonnage {
    pub commodity: String,
    #[serde(default)]
    pub total_grade: Option<f64>,
    #[serde(default)]
    pub total_tonnage: Option<f64>,
    #[serde(default)]
    pub total_contained_metal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMineralSite {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub site_type: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub deposit_types: Vec<RawDepositType>,
    #[serde(default)]
    pub grade_tonnage: Vec<RawGradeTonnage>,
}

impl RawMineralSite {
    /// Commodity code of the first grade/tonnage summary.
    pub fn commodity_code(&self) -> Option<&str> {
        self.grade_tonnage.first().map(|gt| gt.commodity.as_str())
    }

    /// Highest-confidence candidate; the earliest wins a tie.
    pub fn top_deposit_type(&self) -> Option<&RawDepositType> {
        self.deposit_types.iter().fold(None, |best, candidate| match best {
            Some(b) if b.confidence >= candidate.confidence => Some(b),
            _ => Some(candidate),
        })
    }
}

/// Convert site documents to records, indexed by output position.
///
/// Sites without deposit types, with an unresolved top deposit type, or
/// without any grade/tonnage summary are skipped.
pub fn records_from_sites(
    sites: &[RawMineralSite],
    tables: &ReferenceTables,
) -> Vec<DepositRecord> {
    let mut records = Vec::with_capacity(sites.len());
    for site in sites {
        let Some(top) = site.top_deposit_type() else {
            continue;
        };
        let Some(deposit) = tables.deposit_types.get(&top.id) else {
            log::warn!("Skipping site {}: unknown deposit type {}", site.id, top.id);
            continue;
        };
        let Some(gt) = site.grade_tonnage.first() else {
            log::warn!("Skipping site {}: no grade/tonnage summary", site.id);
            continue;
        };

        let location = site.location.clone().unwrap_or_default();
        let mut record = DepositRecord {
            index: RecordIndex(records.len()),
            ms: format!("{}/{}", DERIVED_SITE_PREFIX, site.id),
            ms_name: site.name.clone(),
            commodity: gt.commodity.clone(),
            top1_deposit_name: deposit.name.clone(),
            lat: location.lat.map(qtty::Degrees::new),
            lon: location.lon.map(qtty::Degrees::new),
            total_grade: gt.total_grade,
            total_tonnage: gt.total_tonnage,
            total_contained_metal: gt.total_contained_metal,
        };
        record.normalize_deposit_type();
        records.push(record);
    }

    log::debug!(
        "Converted {} of {} mineral sites into deposit records",
        records.len(),
        sites.len()
    );
    records
}
