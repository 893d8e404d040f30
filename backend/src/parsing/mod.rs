//! Input conversion: row tables and raw mineral-site documents to deposit records.

pub mod sites;
pub mod table;

pub use sites::{records_from_sites, RawMineralSite};
pub use table::{parse_rows, parse_table_json, REQUIRED_COLUMNS};
