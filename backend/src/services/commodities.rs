//! Commodity selection handling: group aliases and the chart title.

use crate::api::CommodityInfo;

pub const REE_MINERALS: &[&str] = &[
    "Lanthanum",
    "Cerium",
    "Praseodymium",
    "Neodymium",
    "Promethium",
    "Samarium",
    "Europium",
    "Gadolinium",
    "Terbium",
    "Dysprosium",
    "Holmium",
    "Erbium",
    "Thulium",
    "Ytterbium",
    "Lutetium",
    "Scandium",
    "Yttrium",
];

pub const HEAVY_REE_MINERALS: &[&str] = &[
    "Gadolinium",
    "Terbium",
    "Dysprosium",
    "Holmium",
    "Erbium",
    "Thulium",
    "Ytterbium",
    "Lutetium",
    "Yttrium",
];

pub const LIGHT_REE_MINERALS: &[&str] = &[
    "Lanthanum",
    "Cerium",
    "Praseodymium",
    "Neodymium",
    "Promethium",
    "Samarium",
    "Europium",
];

pub const PGE_MINERALS: &[&str] = &[
    "Platinum",
    "Palladium",
    "Rhodium",
    "Ruthenium",
    "Iridium",
    "Osmium",
];

/// Selectable aliases that stand for several commodities.
pub const COMMODITY_GROUPS: [(&str, &[&str]); 4] = [
    ("REE", REE_MINERALS),
    ("HEAVY-REE", HEAVY_REE_MINERALS),
    ("LIGHT-REE", LIGHT_REE_MINERALS),
    ("PGE", PGE_MINERALS),
];

/// Members of a group alias, matched case-insensitively.
pub fn group_members(selection: &str) -> Option<&'static [&'static str]> {
    COMMODITY_GROUPS
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(selection.trim()))
        .map(|(_, members)| *members)
}

/// Replace group aliases with their members. Duplicates (case-insensitive)
/// are dropped on first occurrence and blank entries are ignored.
pub fn expand_commodity_selection(selected: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        let name = name.trim();
        if !name.is_empty() && !expanded.iter().any(|e| e.eq_ignore_ascii_case(name)) {
            expanded.push(name.to_string());
        }
    };
    for selection in selected {
        match group_members(selection) {
            Some(members) => members.iter().for_each(|m| push(*m)),
            None => push(selection),
        }
    }
    expanded
}

/// Group aliases as dropdown entries.
pub fn commodity_group_entries() -> Vec<CommodityInfo> {
    COMMODITY_GROUPS
        .iter()
        .map(|(alias, members)| CommodityInfo {
            code: alias.to_string(),
            name: format!("{} ({} commodities)", alias, members.len()),
            is_group: true,
        })
        .collect()
}

/// `"Grade-Tonnage Model of Mineral Deposits (a, b & c)"`.
pub fn chart_title(commodities: &[String]) -> String {
    let list = match commodities {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} & {}", init.join(", "), last),
    };
    format!("Grade-Tonnage Model of Mineral Deposits ({})", list)
}
