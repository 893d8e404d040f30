#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use gtm_rust::db::repositories::{LocalRepository, Snapshot};
use gtm_rust::models::{DepositTypeInfo, ReferenceTables};
use gtm_rust::parsing::sites::{RawDepositType, RawGradeTonnage, RawLocation, RawMineralSite};

pub const COPPER: &str = "Q578";
pub const ZINC: &str = "Q589";
pub const PORPHYRY: &str = "Q380";
pub const SKARN: &str = "Q381";

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily set (`Some`) or removed
/// (`None`), restoring them afterwards even on panic.
///
/// Calls are serialized since the environment is process-global.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore(Vec<(String, Option<String>)>);

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();
        for (key, value) in changes {
            set_or_remove(key, *value);
        }
        Self(saved)
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..) {
            set_or_remove(&key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}

/// Mineral-site document with a single deposit-type candidate and summary.
pub fn site(
    id: &str,
    deposit_type: &str,
    commodity: &str,
    coords: (f64, f64),
    tonnage: Option<f64>,
    grade: Option<f64>,
) -> RawMineralSite {
    RawMineralSite {
        id: id.to_string(),
        name: format!("Site {}", id),
        site_type: Some("MineralSite".to_string()),
        rank: None,
        location: Some(RawLocation {
            lat: Some(coords.0),
            lon: Some(coords.1),
            ..Default::default()
        }),
        deposit_types: vec![RawDepositType {
            id: deposit_type.to_string(),
            confidence: 0.9,
            source: None,
        }],
        grade_tonnage: vec![RawGradeTonnage {
            commodity: commodity.to_string(),
            total_grade: grade,
            total_tonnage: tonnage,
            total_contained_metal: match (grade, tonnage) {
                (Some(g), Some(t)) => Some(g * t / 100.0),
                _ => None,
            },
        }],
    }
}

pub fn reference_tables() -> ReferenceTables {
    let mut tables = ReferenceTables::default();
    tables.commodities.insert(COPPER, "Copper");
    tables.commodities.insert(ZINC, "Zinc");
    for (id, name) in [(PORPHYRY, "Porphyry copper"), (SKARN, "Skarn")] {
        tables.deposit_types.insert(
            id.to_string(),
            DepositTypeInfo {
                name: name.to_string(),
                group: None,
                environment: None,
            },
        );
    }
    tables
}

/// Copper: p1 and p2 about 1.1 km apart, p3 far away, one skarn, one site
/// without tonnage. Zinc: one skarn.
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        reference: reference_tables(),
        sites: vec![
            site("p1", PORPHYRY, COPPER, (0.0, 0.0), Some(100.0), Some(0.5)),
            site("p2", PORPHYRY, COPPER, (0.0, 0.01), Some(300.0), Some(0.3)),
            site("p3", PORPHYRY, COPPER, (10.0, 10.0), Some(50.0), Some(1.0)),
            site("s1", SKARN, COPPER, (5.0, 5.0), Some(20.0), Some(2.0)),
            site("u1", PORPHYRY, COPPER, (6.0, 6.0), None, Some(1.0)),
            site("z1", SKARN, ZINC, (0.0, 0.0), Some(10.0), Some(5.0)),
        ],
    }
}

pub fn sample_repository() -> LocalRepository {
    LocalRepository::from_snapshot(sample_snapshot())
}
