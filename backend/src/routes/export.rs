use serde::{Deserialize, Serialize};

// =========================================================
// CSV export types + route
// =========================================================

/// One row of the downloadable table, under its human-readable column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Mineral Site URL")]
    pub ms: String,
    #[serde(rename = "Mineral Site Name")]
    pub ms_name: String,
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "Deposit Name")]
    pub top1_deposit_name: String,
    #[serde(rename = "Latitude")]
    pub lat: Option<f64>,
    #[serde(rename = "Longitude")]
    pub lon: Option<f64>,
    #[serde(rename = "Total Tonnage(Million tonnes)")]
    pub total_tonnage: Option<f64>,
    #[serde(rename = "Total Grade(Percent)")]
    pub total_grade: Option<f64>,
}

/// Header line of the exported file, in column order.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "Mineral Site URL",
    "Mineral Site Name",
    "Commodity",
    "Deposit Name",
    "Latitude",
    "Longitude",
    "Total Tonnage(Million tonnes)",
    "Total Grade(Percent)",
];

pub const EXPORT_FILE_NAME: &str = "gt_data.csv";

pub const EXPORT_GT_MODEL_DATA: &str = "export_gt_model_data";
