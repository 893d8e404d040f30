//! Data Transfer Objects for the HTTP API.
//!
//! Response DTOs of the model itself are re-exported from the routes module
//! since they already derive Serialize/Deserialize.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use crate::api::{
    AggregatedCluster, AxisBounds, CommodityInfo, CurvePoint, DepositGroupData, DistanceEntry,
    DistanceExtent, ExportRow, GtModelData, GuideCurve, RankedGroup,
};

use crate::algorithms::{ProximityThreshold, RepresentativePolicy};
use crate::config::ModelSettings;
use crate::error::GtModelResult;
use crate::models::{CommodityDictionary, DistanceCache};
use crate::services::GtModelRequest;

/// Separator of `visible` group names in query strings. Group names may
/// contain commas.
pub const VISIBLE_GROUP_SEPARATOR: char = '|';

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityListResponse {
    pub commodities: Vec<CommodityInfo>,
    pub total: usize,
}

/// Query parameters of `GET /v1/gt-model` and its export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GtModelQuery {
    /// Comma-separated commodity names, codes or group aliases
    pub commodities: String,
    /// Kilometers; the configured default when absent
    pub proximity: Option<f64>,
    /// `|`-separated group names; all groups when absent
    pub visible: Option<String>,
    pub representative: Option<String>,
}

impl GtModelQuery {
    pub fn selected_commodities(&self) -> Vec<String> {
        split_list(&self.commodities, ',')
    }

    pub fn to_request(&self, defaults: &ModelSettings) -> GtModelResult<GtModelRequest> {
        model_request(
            self.proximity,
            self.visible
                .as_deref()
                .map(|v| split_list(v, VISIBLE_GROUP_SEPARATOR))
                .unwrap_or_default(),
            self.representative.as_deref(),
            defaults,
        )
    }
}

/// Body of `POST /v1/gt-model`: the table and distances come from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeGtModelRequest {
    /// Row objects with the required deposit columns
    pub rows: Vec<serde_json::Value>,
    pub distances: Vec<DistanceEntry>,
    /// Names shown in the chart title
    pub commodities: Vec<String>,
    /// Commodity code → display name
    pub commodity_names: BTreeMap<String, String>,
    pub proximity: Option<f64>,
    pub visible_groups: Vec<String>,
    pub representative: Option<String>,
}

impl ComputeGtModelRequest {
    pub fn distance_cache(&self) -> GtModelResult<DistanceCache> {
        DistanceCache::from_pairs(
            self.distances
                .iter()
                .map(|e| (e.i, e.j, qtty::Kilometers::new(e.distance_km))),
        )
    }

    pub fn dictionary(&self) -> CommodityDictionary {
        self.commodity_names
            .iter()
            .map(|(code, name)| (code.clone(), name.clone()))
            .collect()
    }

    pub fn to_request(&self, defaults: &ModelSettings) -> GtModelResult<GtModelRequest> {
        model_request(
            self.proximity,
            self.visible_groups.clone(),
            self.representative.as_deref(),
            defaults,
        )
    }
}

fn model_request(
    proximity: Option<f64>,
    visible_groups: Vec<String>,
    representative: Option<&str>,
    defaults: &ModelSettings,
) -> GtModelResult<GtModelRequest> {
    let proximity = match proximity {
        Some(km) => ProximityThreshold::new(km)?,
        None => defaults.default_proximity_km,
    };
    let representative = match representative {
        Some(name) => name.parse::<RepresentativePolicy>()?,
        None => defaults.representative,
    };
    Ok(GtModelRequest {
        proximity,
        visible_groups,
        representative,
    })
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
