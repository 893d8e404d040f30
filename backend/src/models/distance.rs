//! Precomputed pairwise distances between deposit records.
//!
//! The cache is symmetric: a pair is stored once under its ordered key and a
//! lookup accepts either order. An absent pair means "distance unknown", which
//! the aggregator treats as non-mergeable.

use std::collections::BTreeMap;

use qtty::Kilometers;

use crate::algorithms::geodesy::haversine_distance;
use crate::api::RecordIndex;
use crate::error::{GtModelError, GtModelResult};
use crate::models::DepositRecord;

/// Symmetric map from an unordered record pair to a distance in kilometers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceCache {
    distances: BTreeMap<(RecordIndex, RecordIndex), Kilometers>,
}

fn ordered(i: RecordIndex, j: RecordIndex) -> (RecordIndex, RecordIndex) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from `(i, j, distance)` triples.
    pub fn from_pairs<I>(pairs: I) -> GtModelResult<Self>
    where
        I: IntoIterator<Item = (RecordIndex, RecordIndex, Kilometers)>,
    {
        let mut cache = Self::new();
        for (i, j, distance) in pairs {
            cache.insert(i, j, distance)?;
        }
        Ok(cache)
    }

    /// Build a cache of great-circle distances between every two records of the
    /// same deposit type that both carry coordinates.
    pub fn from_records(records: &[DepositRecord]) -> Self {
        let mut by_type: BTreeMap<&str, Vec<&DepositRecord>> = BTreeMap::new();
        for record in records {
            if record.coordinates().is_some() {
                by_type
                    .entry(record.top1_deposit_name.as_str())
                    .or_default()
                    .push(record);
            }
        }

        let mut cache = Self::new();
        for group in by_type.values() {
            for (pos, a) in group.iter().enumerate() {
                for b in &group[pos + 1..] {
                    if a.index == b.index {
                        continue;
                    }
                    if let (Some(pa), Some(pb)) = (a.coordinates(), b.coordinates()) {
                        let d = haversine_distance(pa, pb);
                        cache.distances.insert(ordered(a.index, b.index), d);
                    }
                }
            }
        }
        log::debug!("Computed {} pairwise distances", cache.len());
        cache
    }

    /// Store the distance between two distinct records.
    pub fn insert(
        &mut self,
        i: RecordIndex,
        j: RecordIndex,
        distance: Kilometers,
    ) -> GtModelResult<()> {
        if i == j {
            return Err(GtModelError::InvalidDistance {
                i,
                j,
                message: "a record has no distance to itself".to_string(),
            });
        }
        let value = distance.value();
        if !value.is_finite() || value < 0.0 {
            return Err(GtModelError::InvalidDistance {
                i,
                j,
                message: format!("distance must be a non-negative number, got {}", value),
            });
        }
        self.distances.insert(ordered(i, j), distance);
        Ok(())
    }

    /// Precomputed distance between `i` and `j`, in either order.
    pub fn distance(&self, i: RecordIndex, j: RecordIndex) -> Option<Kilometers> {
        self.distances.get(&ordered(i, j)).copied()
    }

    /// Smallest and largest stored distance, or `None` for an empty cache.
    pub fn extent(&self) -> Option<(Kilometers, Kilometers)> {
        let mut values = self.distances.values().map(|d| d.value());
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some((Kilometers::new(min), Kilometers::new(max)))
    }

    /// All pairs ascending by distance; equal distances keep key order.
    pub fn sorted_pairs(&self) -> Vec<(RecordIndex, RecordIndex, Kilometers)> {
        let mut pairs: Vec<_> = self
            .distances
            .iter()
            .map(|(&(i, j), &d)| (i, j, d))
            .collect();
        // BTreeMap iteration already orders by key, and the sort is stable.
        pairs.sort_by(|a, b| a.2.value().total_cmp(&b.2.value()));
        pairs
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}
