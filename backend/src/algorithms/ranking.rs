//! Display ordering of deposit-type groups.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::api::RankedGroup;
use crate::models::{DepositRecord, UNKNOWN_DEPOSIT_TYPE};

#[derive(Default)]
struct GroupStats {
    count: usize,
    ratio_sum: f64,
    ratio_count: usize,
}

impl GroupStats {
    fn avg_metal_per_tonnage(&self) -> Option<f64> {
        (self.ratio_count > 0).then(|| self.ratio_sum / self.ratio_count as f64)
    }
}

/// Orders groups by record count, then by mean metal intensity, both
/// descending. `"Unknown"` always goes last.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepositGroupRanker;

impl DepositGroupRanker {
    pub fn rank(&self, records: &[DepositRecord]) -> Vec<RankedGroup> {
        let mut stats: BTreeMap<&str, GroupStats> = BTreeMap::new();
        for record in records {
            let entry = stats.entry(record.top1_deposit_name.as_str()).or_default();
            entry.count += 1;
            if let Some(ratio) = record.metal_per_tonnage() {
                entry.ratio_sum += ratio;
                entry.ratio_count += 1;
            }
        }

        let mut ordered: Vec<(&str, usize, Option<f64>)> = stats
            .iter()
            .map(|(name, s)| (*name, s.count, s.avg_metal_per_tonnage()))
            .collect();

        ordered.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| compare_intensity(b.2, a.2))
                .then_with(|| a.0.cmp(b.0))
        });

        if let Some(pos) = ordered.iter().position(|g| g.0 == UNKNOWN_DEPOSIT_TYPE) {
            let unknown = ordered.remove(pos);
            ordered.push(unknown);
        }

        let n = ordered.len();
        ordered
            .into_iter()
            .enumerate()
            .map(|(rank, (name, count, avg))| RankedGroup {
                name: name.to_string(),
                count,
                avg_metal_per_tonnage: avg,
                rank,
                hue: hue_for_rank(rank, n),
                label: format!("{} ({})", name, count),
            })
            .collect()
    }
}

/// `None` sorts below any value.
fn compare_intensity(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Evenly spaced over `[0, 1]`.
pub fn hue_for_rank(rank: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        rank as f64 / (n - 1) as f64
    }
}
