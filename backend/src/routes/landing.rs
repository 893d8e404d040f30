use serde::{Deserialize, Serialize};

/// A selectable commodity, or a commodity group that expands to several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityInfo {
    pub code: String,
    pub name: String,
    pub is_group: bool,
}

pub const LIST_COMMODITIES: &str = "list_commodities";
