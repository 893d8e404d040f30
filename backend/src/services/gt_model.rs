//! Grade-tonnage model orchestration.
//!
//! [`GradeTonnageDataset`] owns one request's records and distances and turns
//! them into the complete plot dataset: ranked groups, per-group aggregated
//! clusters, guide curves and axis bounds. Building is pure; nothing is kept
//! between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::algorithms::aggregation::ensure_unique_indices;
use crate::algorithms::{
    ChartGeometryBuilder, DepositGroupRanker, GreedyAggregator, GuideCurveSettings,
    ProximityThreshold, RepresentativePolicy,
};
use crate::api::{DepositGroupData, DistanceExtent, GtModelData};
use crate::db::repository::DepositRepository;
use crate::error::{GtModelError, GtModelResult};
use crate::models::{AggregatedCluster, CommodityDictionary, DepositRecord, DistanceCache};
use crate::services::commodities::{chart_title, expand_commodity_selection};

/// Per-request model parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtModelRequest {
    /// Zero disables aggregation
    pub proximity: ProximityThreshold,
    /// Groups to mark visible; empty means all
    pub visible_groups: Vec<String>,
    pub representative: RepresentativePolicy,
}

impl GtModelRequest {
    pub fn is_visible(&self, group: &str) -> bool {
        self.visible_groups.is_empty() || self.visible_groups.iter().any(|g| g == group)
    }
}

pub struct GradeTonnageDataset {
    records: Vec<DepositRecord>,
    distances: DistanceCache,
    commodities: Vec<String>,
    dictionary: CommodityDictionary,
    geometry: ChartGeometryBuilder,
}

impl GradeTonnageDataset {
    /// Rejects records that share an index, since the distance cache is keyed by it.
    pub fn new(
        records: Vec<DepositRecord>,
        distances: DistanceCache,
        commodities: Vec<String>,
    ) -> GtModelResult<Self> {
        ensure_unique_indices(&records)?;
        Ok(Self {
            records,
            distances,
            commodities,
            dictionary: CommodityDictionary::default(),
            geometry: ChartGeometryBuilder::default(),
        })
    }

    pub fn with_dictionary(mut self, dictionary: CommodityDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_guide_curves(mut self, settings: GuideCurveSettings) -> Self {
        self.geometry = ChartGeometryBuilder::new(settings);
        self
    }

    pub fn records(&self) -> &[DepositRecord] {
        &self.records
    }

    pub fn distances(&self) -> &DistanceCache {
        &self.distances
    }

    pub fn build(&self, request: &GtModelRequest) -> GtModelData {
        let ranked_groups = DepositGroupRanker.rank(&self.records);
        let aggregator =
            GreedyAggregator::new(request.proximity).with_policy(request.representative);

        let mut by_group: BTreeMap<&str, Vec<DepositRecord>> = BTreeMap::new();
        for record in &self.records {
            by_group
                .entry(record.top1_deposit_name.as_str())
                .or_default()
                .push(record.clone());
        }

        let groups: Vec<DepositGroupData> = ranked_groups
            .iter()
            .map(|ranked| {
                let members = by_group
                    .get(ranked.name.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                // Unknown records have no usable measures to merge.
                let aggregated = !request.proximity.is_disabled()
                    && ranked.name != crate::models::UNKNOWN_DEPOSIT_TYPE;
                let clusters: Vec<AggregatedCluster> = if aggregated {
                    aggregator.partition(members, &self.distances)
                } else {
                    members.iter().map(AggregatedCluster::singleton).collect()
                };
                log::debug!(
                    "Group '{}': {} records -> {} clusters",
                    ranked.name,
                    members.len(),
                    clusters.len()
                );
                DepositGroupData {
                    name: ranked.name.clone(),
                    hue: ranked.hue,
                    visible: request.is_visible(&ranked.name),
                    aggregated,
                    record_count: members.len(),
                    clusters,
                }
            })
            .collect();

        let total_clusters = groups.iter().map(|g| g.clusters.len()).sum();
        let grade_fallback_count = groups
            .iter()
            .flat_map(|g| &g.clusters)
            .filter(|c| c.grade_fallback)
            .count();

        let commodity_names = self
            .dictionary
            .subset(self.records.iter().map(|r| r.commodity.as_str()));

        GtModelData {
            title: chart_title(&self.commodities),
            commodities: self.commodities.clone(),
            commodity_names,
            proximity_km: request.proximity.kilometers().value(),
            representative: request.representative,
            ranked_groups,
            groups,
            guide_curves: self.geometry.guide_curves(),
            axis_bounds: self.geometry.axis_bounds(&self.records),
            distance_extent: self.distances.extent().map(|(min, max)| DistanceExtent {
                min_km: min.value(),
                max_km: max.value(),
            }),
            total_records: self.records.len(),
            total_clusters,
            grade_fallback_count,
        }
    }
}

/// Compute the model directly from caller-supplied inputs.
pub fn compute_gt_model_data(
    records: Vec<DepositRecord>,
    distances: DistanceCache,
    commodities: Vec<String>,
    dictionary: CommodityDictionary,
    request: &GtModelRequest,
    guide_curves: GuideCurveSettings,
) -> GtModelResult<GtModelData> {
    let dataset = GradeTonnageDataset::new(records, distances, commodities)?
        .with_dictionary(dictionary)
        .with_guide_curves(guide_curves);
    Ok(dataset.build(request))
}

/// Fetch the selected commodities from the repository and build the model.
///
/// Group aliases in `selected` (REE, PGE, ...) are expanded first.
pub async fn get_gt_model_data<R: DepositRepository + ?Sized>(
    repo: &R,
    selected: &[String],
    request: &GtModelRequest,
    guide_curves: GuideCurveSettings,
) -> GtModelResult<GtModelData> {
    let commodities = expand_commodity_selection(selected);
    if commodities.is_empty() {
        return Err(GtModelError::NoCommoditySelected);
    }

    let inputs = crate::db::services::load_model_inputs(repo, &commodities).await?;
    compute_gt_model_data(
        inputs.records,
        inputs.distances,
        commodities,
        inputs.dictionary,
        request,
        guide_curves,
    )
}
