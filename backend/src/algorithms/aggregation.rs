//! Proximity-based greedy aggregation of a deposit-type group.
//!
//! Records of one group whose precomputed distance is strictly below a
//! threshold are merged into a single tonnage-weighted row. Seeds are taken in
//! the order in which record indices appear in the distance-sorted pair list,
//! so the closest pairs open clusters first. Within a cluster, neighbours are
//! collected in that same order (first come, not nearest first).
//!
//! The result is a partition: every record of the group ends up in exactly one
//! cluster. Records that never appear in a cache pair become singletons.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use qtty::{Degrees, Kilometers};
use serde::{Deserialize, Serialize};

use crate::api::RecordIndex;
use crate::error::{GtModelError, GtModelResult};
use crate::models::cluster::{join_member_labels, total_tonnage, weighted_grade};
use crate::models::{AggregatedCluster, DepositRecord, DistanceCache};

/// User-chosen proximity cutoff in kilometers. Zero disables aggregation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProximityThreshold(Kilometers);

impl ProximityThreshold {
    /// The unaggregated view.
    pub const DISABLED: ProximityThreshold = ProximityThreshold(Kilometers::new(0.0));

    pub fn new(km: f64) -> GtModelResult<Self> {
        if km.is_nan() || km < 0.0 || km.is_infinite() {
            return Err(GtModelError::NegativeProximity(km));
        }
        Ok(Self(Kilometers::new(km)))
    }

    pub fn kilometers(&self) -> Kilometers {
        self.0
    }

    pub fn is_disabled(&self) -> bool {
        self.0.value() == 0.0
    }

    /// Strict comparison: a distance equal to the threshold does not merge.
    pub fn admits(&self, distance: Kilometers) -> bool {
        distance.value() < self.0.value()
    }
}

impl Default for ProximityThreshold {
    fn default() -> Self {
        Self::DISABLED
    }
}

impl TryFrom<f64> for ProximityThreshold {
    type Error = GtModelError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProximityThreshold> for f64 {
    fn from(threshold: ProximityThreshold) -> Self {
        threshold.0.value()
    }
}

/// How a merged cluster picks its plotted location, commodity and deposit name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativePolicy {
    /// Every field from the first member added (the seed).
    #[default]
    #[serde(alias = "first")]
    FirstMember,
    /// Mean of the member coordinates that are present; other fields from the seed.
    Centroid,
    /// Every field from the member with the largest tonnage; ties go to the earliest.
    #[serde(alias = "largest")]
    LargestTonnage,
}

impl RepresentativePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstMember => "first",
            Self::Centroid => "centroid",
            Self::LargestTonnage => "largest",
        }
    }
}

impl FromStr for RepresentativePolicy {
    type Err = GtModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "first_member" | "seed" => Ok(Self::FirstMember),
            "centroid" | "mean" => Ok(Self::Centroid),
            "largest" | "largest_tonnage" => Ok(Self::LargestTonnage),
            other => Err(GtModelError::UnknownRepresentativePolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for RepresentativePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greedy nearest-first aggregator over one deposit-type group.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAggregator {
    threshold: ProximityThreshold,
    policy: RepresentativePolicy,
}

impl GreedyAggregator {
    pub fn new(threshold: ProximityThreshold) -> Self {
        Self {
            threshold,
            policy: RepresentativePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RepresentativePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn threshold(&self) -> ProximityThreshold {
        self.threshold
    }

    /// Partition `records` into clusters.
    ///
    /// Records must carry distinct indices, whatever the threshold; a repeated
    /// index is rejected with [`GtModelError::DuplicateRecordIndex`].
    pub fn aggregate(
        &self,
        records: &[DepositRecord],
        distances: &DistanceCache,
    ) -> GtModelResult<Vec<AggregatedCluster>> {
        ensure_unique_indices(records)?;
        Ok(self.partition(records, distances))
    }

    /// [`GreedyAggregator::aggregate`] for records already known to carry
    /// distinct indices.
    pub(crate) fn partition(
        &self,
        records: &[DepositRecord],
        distances: &DistanceCache,
    ) -> Vec<AggregatedCluster> {
        if self.threshold.is_disabled() {
            return records.iter().map(AggregatedCluster::singleton).collect();
        }

        let by_index: HashMap<RecordIndex, &DepositRecord> =
            records.iter().map(|r| (r.index, r)).collect();

        let seeds = seed_order(&by_index, distances);
        let mut assigned: HashSet<RecordIndex> = HashSet::with_capacity(records.len());
        let mut groups: Vec<Vec<RecordIndex>> = Vec::new();

        for &seed in &seeds {
            if !assigned.insert(seed) {
                continue;
            }
            let mut group = vec![seed];
            for &candidate in &seeds {
                if candidate == seed || assigned.contains(&candidate) {
                    continue;
                }
                let close_enough = distances
                    .distance(seed, candidate)
                    .is_some_and(|d| self.threshold.admits(d));
                if close_enough {
                    assigned.insert(candidate);
                    group.push(candidate);
                }
            }
            groups.push(group);
        }

        // Records without any known distance never appear as seeds.
        for record in records {
            if assigned.insert(record.index) {
                groups.push(vec![record.index]);
            }
        }

        let clusters: Vec<AggregatedCluster> = groups
            .iter()
            .map(|group| {
                let members: Vec<&DepositRecord> =
                    group.iter().filter_map(|i| by_index.get(i).copied()).collect();
                self.build_cluster(&members)
            })
            .collect();

        log::debug!(
            "Aggregated {} records into {} clusters (threshold {} km)",
            by_index.len(),
            clusters.len(),
            self.threshold.kilometers().value()
        );
        clusters
    }

    fn build_cluster(&self, members: &[&DepositRecord]) -> AggregatedCluster {
        if let [single] = members {
            return AggregatedCluster::singleton(single);
        }

        let (grade, grade_fallback) = weighted_grade(members);
        if grade_fallback {
            log::warn!(
                "Zero tonnage weight for cluster seeded by {}; using unweighted mean grade",
                members[0].ms
            );
        }

        let site_names: Vec<String> = members.iter().map(|r| r.ms_name.clone()).collect();
        let site_ids: Vec<String> = members.iter().map(|r| r.ms.clone()).collect();
        let representative = self.representative(members);
        let (lat, lon) = match self.policy {
            RepresentativePolicy::Centroid => centroid(members),
            _ => (representative.lat, representative.lon),
        };

        AggregatedCluster {
            members: members.iter().map(|r| r.index).collect(),
            ms_name: join_member_labels(&site_names),
            ms: join_member_labels(&site_ids),
            site_names,
            site_ids,
            total_grade: grade,
            total_tonnage: total_tonnage(members),
            commodity: representative.commodity.clone(),
            top1_deposit_name: representative.top1_deposit_name.clone(),
            lat,
            lon,
            grade_fallback,
        }
    }

    fn representative<'a>(&self, members: &[&'a DepositRecord]) -> &'a DepositRecord {
        match self.policy {
            RepresentativePolicy::LargestTonnage => {
                let mut best = members[0];
                for &candidate in &members[1..] {
                    let heavier = match (candidate.total_tonnage, best.total_tonnage) {
                        (Some(c), Some(b)) => c > b,
                        (Some(_), None) => true,
                        _ => false,
                    };
                    if heavier {
                        best = candidate;
                    }
                }
                best
            }
            _ => members[0],
        }
    }
}

/// Fails on the first record whose index was already seen.
pub(crate) fn ensure_unique_indices(records: &[DepositRecord]) -> GtModelResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    match records.iter().find(|r| !seen.insert(r.index)) {
        Some(dup) => Err(GtModelError::DuplicateRecordIndex(dup.index)),
        None => Ok(()),
    }
}

/// Record indices of the group in the order of the distance-sorted pairs,
/// duplicates dropped on first occurrence.
fn seed_order(
    by_index: &HashMap<RecordIndex, &DepositRecord>,
    distances: &DistanceCache,
) -> Vec<RecordIndex> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for (i, j, _) in distances.sorted_pairs() {
        for index in [i, j] {
            if by_index.contains_key(&index) && seen.insert(index) {
                order.push(index);
            }
        }
    }
    order
}

fn centroid(members: &[&DepositRecord]) -> (Option<Degrees>, Option<Degrees>) {
    let coords: Vec<(f64, f64)> = members
        .iter()
        .filter_map(|r| r.coordinates())
        .map(|(lat, lon)| (lat.value(), lon.value()))
        .collect();
    if coords.is_empty() {
        return (members[0].lat, members[0].lon);
    }
    let n = coords.len() as f64;
    let lat = coords.iter().map(|c| c.0).sum::<f64>() / n;
    let lon = coords.iter().map(|c| c.1).sum::<f64>() / n;
    (Some(Degrees::new(lat)), Some(Degrees::new(lon)))
}
