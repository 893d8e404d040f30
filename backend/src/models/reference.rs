//! Reference dictionaries resolved by the data source.
//!
//! The mineral-site service publishes lookup tables keyed by the last segment
//! of each entry's URI. Only the commodity and deposit-type tables matter to
//! the grade-tonnage model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of the deposit-type dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositTypeInfo {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

/// Commodity code → display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommodityDictionary {
    names: BTreeMap<String, String>,
}

impl CommodityDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.names.insert(code.into(), name.into());
    }

    /// Display name of a commodity code.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Display name, falling back to the code itself.
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.name_of(code).unwrap_or(code)
    }

    /// Code → name entries restricted to `codes`.
    pub fn subset<'a, I>(&self, codes: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes
            .into_iter()
            .map(|code| (code.to_string(), self.resolve(code).to_string()))
            .collect()
    }

    /// All display names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.values().cloned().collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for CommodityDictionary {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Lookup tables used when converting raw mineral-site documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub commodities: CommodityDictionary,
    #[serde(default)]
    pub deposit_types: BTreeMap<String, DepositTypeInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commodity_resolution() {
        let mut dict = CommodityDictionary::new();
        dict.insert("Q578", "Copper");

        assert_eq!(dict.name_of("Q578"), Some("Copper"));
        assert_eq!(dict.resolve("Q578"), "Copper");
        assert_eq!(dict.resolve("Q999"), "Q999");
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_subset_keeps_unknown_codes() {
        let dict: CommodityDictionary = vec![
            ("Q1".to_string(), "Zinc".to_string()),
            ("Q2".to_string(), "Lead".to_string()),
        ]
        .into_iter()
        .collect();

        let subset = dict.subset(["Q2", "Q3"]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset["Q2"], "Lead");
        assert_eq!(subset["Q3"], "Q3");
    }

    #[test]
    fn test_reference_tables_deserialize() {
        let json = r#"{
            "commodities": {"Q578": "Copper"},
            "deposit_types": {"Q380": {"name": "Porphyry copper", "group": "Porphyry"}}
        }"#;
        let tables: ReferenceTables = serde_json::from_str(json).unwrap();
        assert_eq!(tables.commodities.resolve("Q578"), "Copper");
        assert_eq!(tables.deposit_types["Q380"].name, "Porphyry copper");
        assert!(tables.deposit_types["Q380"].environment.is_none());
    }
}
