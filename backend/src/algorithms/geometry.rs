//! Log-log chart framing and the iso-metal guide curves.
//!
//! Axis bounds are taken from the unaggregated records so the framing does not
//! move when the proximity threshold changes.

use serde::{Deserialize, Serialize};

use crate::api::{AxisBounds, CurvePoint, GuideCurve};
use crate::models::DepositRecord;

/// Parameters of the guide curve family. Exponents are base 10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideCurveSettings {
    pub levels: usize,
    pub level_min_exp: f64,
    pub level_max_exp: f64,
    pub samples: usize,
    pub tonnage_min_exp: f64,
    pub tonnage_max_exp: f64,
}

impl Default for GuideCurveSettings {
    fn default() -> Self {
        Self {
            levels: 20,
            level_min_exp: -9.0,
            level_max_exp: 10.0,
            samples: 100,
            tonnage_min_exp: -8.0,
            tonnage_max_exp: 8.0,
        }
    }
}

/// Padding factor applied around the data extent on both axes.
const AXIS_PADDING: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartGeometryBuilder {
    settings: GuideCurveSettings,
}

impl ChartGeometryBuilder {
    pub fn new(settings: GuideCurveSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GuideCurveSettings {
        &self.settings
    }

    /// `[log10(min/5), log10(max*5)]` for tonnage (x) and grade (y).
    ///
    /// Only present, finite, strictly positive values count. Returns `None`
    /// when either axis has no such value.
    pub fn axis_bounds(&self, records: &[DepositRecord]) -> Option<AxisBounds> {
        let x_range = padded_log_range(records.iter().filter_map(|r| r.total_tonnage))?;
        let y_range = padded_log_range(records.iter().filter_map(|r| r.total_grade))?;
        Some(AxisBounds { x_range, y_range })
    }

    /// One curve per metal-content level; each point satisfies
    /// `tonnage * grade == level`.
    pub fn guide_curves(&self) -> Vec<GuideCurve> {
        let s = &self.settings;
        let tonnages = logspace(s.tonnage_min_exp, s.tonnage_max_exp, s.samples);
        logspace(s.level_min_exp, s.level_max_exp, s.levels)
            .into_iter()
            .map(|level| GuideCurve {
                metal_content: level,
                label: format!("Contained Metal: {} Mt", format_metal(level / 100.0)),
                points: tonnages
                    .iter()
                    .map(|&tonnage| CurvePoint {
                        tonnage,
                        grade: level / tonnage,
                    })
                    .collect(),
            })
            .collect()
    }
}

fn padded_log_range(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    let mut extent: Option<(f64, f64)> = None;
    for v in values.filter(|v| v.is_finite() && *v > 0.0) {
        extent = Some(match extent {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    let (lo, hi) = extent?;
    Some([(lo / AXIS_PADDING).log10(), (hi * AXIS_PADDING).log10()])
}

/// `n` values spaced evenly in log10 space from `10^start` to `10^stop`, both
/// ends included.
pub fn logspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| 10f64.powf(start + step * i as f64))
                .collect()
        }
    }
}

fn format_metal(value: f64) -> String {
    if (1e-3..1e6).contains(&value) {
        let text = format!("{:.3}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        format!("{:.0e}", value)
    }
}
