//! In-memory local repository implementation.
//!
//! Holds reference tables and raw mineral-site documents in memory. Data is
//! either added programmatically (tests, local development) or loaded from a
//! JSON snapshot of the mineral-site service.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::api::{CommodityInfo, RecordIndex};
use crate::db::repository::*;
use crate::models::{
    CommodityDictionary, DepositRecord, DepositTypeInfo, DistanceCache, ReferenceTables,
};
use crate::parsing::sites::{records_from_sites, RawMineralSite};

/// On-disk form of the local data set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub reference: ReferenceTables,
    #[serde(default)]
    pub sites: Vec<RawMineralSite>,
}

/// In-memory local repository.
///
/// # Example
/// ```
/// use gtm_rust::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// repo.insert_commodity("Q578", "Copper");
/// assert_eq!(repo.site_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    reference: ReferenceTables,
    sites: Vec<RawMineralSite>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            reference: ReferenceTables::default(),
            sites: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let repo = Self::new();
        {
            let mut data = repo.data.write();
            data.reference = snapshot.reference;
            data.sites = snapshot.sites;
        }
        repo
    }

    /// Load a snapshot file written by [`LocalRepository::save_snapshot`] or
    /// exported from the mineral-site service.
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let context = || {
            ErrorContext::new("load_snapshot")
                .with_entity("snapshot")
                .with_entity_id(path.display())
        };
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read snapshot: {}", e),
                context(),
            )
        })?;
        let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to parse snapshot: {}", e),
                context(),
            )
        })?;
        log::info!(
            "Loaded snapshot {} ({} sites, {} commodities)",
            path.display(),
            snapshot.sites.len(),
            snapshot.reference.commodities.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> RepositoryResult<()> {
        let snapshot = {
            let data = self.data.read();
            Snapshot {
                reference: data.reference.clone(),
                sites: data.sites.clone(),
            }
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| {
                RepositoryError::internal(format!("Failed to serialize snapshot: {}", e))
            })?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            RepositoryError::configuration(format!("Failed to write snapshot: {}", e))
                .with_operation("save_snapshot")
        })
    }

    pub fn add_site(&self, site: RawMineralSite) {
        self.data.write().sites.push(site);
    }

    pub fn insert_commodity(&self, code: impl Into<String>, name: impl Into<String>) {
        self.data.write().reference.commodities.insert(code, name);
    }

    pub fn insert_deposit_type(&self, id: impl Into<String>, info: DepositTypeInfo) {
        self.data.write().reference.deposit_types.insert(id.into(), info);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    pub fn site_count(&self) -> usize {
        self.data.read().sites.len()
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::unavailable("Local repository is marked unhealthy")
                .with_operation(operation))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Commodity codes a selection refers to: the code itself, or every code whose
/// display name matches.
fn matching_codes(
    selection: &str,
    dictionary: &CommodityDictionary,
    sites: &[RawMineralSite],
) -> HashSet<String> {
    let wanted = selection.trim().to_lowercase();
    sites
        .iter()
        .filter_map(RawMineralSite::commodity_code)
        .filter(|code| {
            code.to_lowercase() == wanted
                || dictionary
                    .name_of(code)
                    .is_some_and(|name| name.to_lowercase() == wanted)
        })
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl DepositRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_commodities(&self) -> RepositoryResult<Vec<CommodityInfo>> {
        self.ensure_healthy("list_commodities")?;
        let data = self.data.read();
        let mut by_code: BTreeMap<&str, &str> = BTreeMap::new();
        for code in data.sites.iter().filter_map(RawMineralSite::commodity_code) {
            by_code.insert(code, data.reference.commodities.resolve(code));
        }
        let mut commodities: Vec<CommodityInfo> = by_code
            .into_iter()
            .map(|(code, name)| CommodityInfo {
                code: code.to_string(),
                name: name.to_string(),
                is_group: false,
            })
            .collect();
        commodities.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
        Ok(commodities)
    }

    async fn fetch_deposit_records(
        &self,
        commodities: &[String],
    ) -> RepositoryResult<Vec<DepositRecord>> {
        self.ensure_healthy("fetch_deposit_records")?;
        let data = self.data.read();

        let mut seen_sites: HashSet<&str> = HashSet::new();
        let mut records = Vec::new();
        for selection in commodities {
            let codes = matching_codes(selection, &data.reference.commodities, &data.sites);
            if codes.is_empty() {
                log::debug!("No sites for commodity '{}'", selection);
                continue;
            }
            let selected: Vec<RawMineralSite> = data
                .sites
                .iter()
                .filter(|site| {
                    site.commodity_code().is_some_and(|c| codes.contains(c))
                        && seen_sites.insert(site.id.as_str())
                })
                .cloned()
                .collect();
            records.extend(records_from_sites(&selected, &data.reference));
        }

        for (position, record) in records.iter_mut().enumerate() {
            record.index = RecordIndex(position);
        }
        Ok(records)
    }

    async fn fetch_distance_cache(
        &self,
        records: &[DepositRecord],
    ) -> RepositoryResult<DistanceCache> {
        self.ensure_healthy("fetch_distance_cache")?;
        Ok(DistanceCache::from_records(records))
    }

    async fn fetch_commodity_dictionary(&self) -> RepositoryResult<CommodityDictionary> {
        self.ensure_healthy("fetch_commodity_dictionary")?;
        Ok(self.data.read().reference.commodities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::sites::{RawDepositType, RawGradeTonnage, RawLocation};

    fn site(id: &str, commodity: &str, lat: f64) -> RawMineralSite {
        RawMineralSite {
            id: id.to_string(),
            name: id.to_uppercase(),
            site_type: None,
            rank: None,
            location: Some(RawLocation {
                lat: Some(lat),
                lon: Some(0.0),
                ..Default::default()
            }),
            deposit_types: vec![RawDepositType {
                id: "Q380".to_string(),
                confidence: 1.0,
                source: None,
            }],
            grade_tonnage: vec![RawGradeTonnage {
                commodity: commodity.to_string(),
                total_grade: Some(1.0),
                total_tonnage: Some(10.0),
                total_contained_metal: Some(0.1),
            }],
        }
    }

    fn seeded() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.insert_commodity("Q578", "Copper");
        repo.insert_commodity("Q1", "Zinc");
        repo.insert_deposit_type(
            "Q380",
            DepositTypeInfo {
                name: "Porphyry copper".to_string(),
                group: None,
                environment: None,
            },
        );
        repo.add_site(site("a", "Q578", 0.0));
        repo.add_site(site("b", "Q1", 0.01));
        repo.add_site(site("c", "Q578", 0.02));
        repo
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(matches!(
            repo.fetch_commodity_dictionary().await,
            Err(RepositoryError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_by_name_and_code() {
        let repo = seeded();
        let by_name = repo
            .fetch_deposit_records(&["copper".to_string()])
            .await
            .unwrap();
        assert_eq!(by_name.len(), 2);

        let both = repo
            .fetch_deposit_records(&["Q578".to_string(), "Zinc".to_string()])
            .await
            .unwrap();
        let indices: Vec<usize> = both.iter().map(|r| r.index.value()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(both[2].ms, "/derived/b");
    }

    #[tokio::test]
    async fn test_repeated_selection_does_not_duplicate_sites() {
        let repo = seeded();
        let records = repo
            .fetch_deposit_records(&["Copper".to_string(), "Q578".to_string()])
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_commodity_yields_no_records() {
        let repo = seeded();
        let records = repo
            .fetch_deposit_records(&["unobtainium".to_string()])
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_commodities_sorted_by_name() {
        let commodities = seeded().list_commodities().await.unwrap();
        let names: Vec<_> = commodities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Copper", "Zinc"]);
        assert!(commodities.iter().all(|c| !c.is_group));
    }

    #[tokio::test]
    async fn test_distance_cache_from_records() {
        let repo = seeded();
        let records = repo
            .fetch_deposit_records(&["Copper".to_string()])
            .await
            .unwrap();
        let cache = repo.fetch_distance_cache(&records).await.unwrap();
        assert_eq!(cache.len(), 1);
        let d = cache.distance(RecordIndex(0), RecordIndex(1)).unwrap();
        // 0.02 degrees of latitude
        assert!((d.value() - 2.2239).abs() < 1e-3, "got {}", d.value());
    }

    #[test]
    fn test_snapshot_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        seeded().save_snapshot(&path).unwrap();

        let loaded = LocalRepository::from_snapshot_file(&path).unwrap();
        assert_eq!(loaded.site_count(), 3);

        let missing = LocalRepository::from_snapshot_file(dir.path().join("nope.json"));
        assert!(matches!(
            missing,
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_clear_keeps_health() {
        let repo = seeded();
        repo.set_healthy(false);
        repo.clear();
        assert_eq!(repo.site_count(), 0);
        assert!(!repo.data.read().is_healthy);
    }
}
