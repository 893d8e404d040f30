//! Service layer for business logic and orchestration.
//!
//! Services sit between the data source and the HTTP layer. They expand
//! commodity selections, fetch model inputs and build the grade-tonnage
//! dataset and its CSV export.

pub mod commodities;
pub mod export;
pub mod gt_model;

pub use commodities::{chart_title, expand_commodity_selection};
pub use export::{export_csv, export_rows, to_csv};
pub use gt_model::{compute_gt_model_data, get_gt_model_data, GradeTonnageDataset, GtModelRequest};
