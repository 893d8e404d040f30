//! CSV export of the visible aggregated clusters.

use crate::api::{ExportRow, GtModelData};
use crate::error::{GtModelError, GtModelResult};
use crate::models::AggregatedCluster;
use crate::routes::export::EXPORT_COLUMNS;

/// Separator of member names/ids in exported cells.
pub const EXPORT_MEMBER_SEPARATOR: &str = ", ";

/// Flatten the clusters of every visible group, in rank order.
///
/// Member names and ids are joined with `", "` and carry no leading separator.
/// The commodity column holds the display name rather than the raw code, so the
/// file reads the same as the chart legend; codes the dictionary does not know
/// are written as-is.
pub fn export_rows(data: &GtModelData) -> Vec<ExportRow> {
    data.visible_groups()
        .flat_map(|group| &group.clusters)
        .map(|cluster| export_row(cluster, data))
        .collect()
}

fn export_row(cluster: &AggregatedCluster, data: &GtModelData) -> ExportRow {
    ExportRow {
        ms: cluster.site_ids.join(EXPORT_MEMBER_SEPARATOR),
        ms_name: cluster.site_names.join(EXPORT_MEMBER_SEPARATOR),
        commodity: data
            .commodity_names
            .get(&cluster.commodity)
            .cloned()
            .unwrap_or_else(|| cluster.commodity.clone()),
        top1_deposit_name: cluster.top1_deposit_name.clone(),
        lat: cluster.lat.map(|d| d.value()),
        lon: cluster.lon.map(|d| d.value()),
        total_tonnage: cluster.total_tonnage,
        total_grade: cluster.total_grade,
    }
}

/// Serialize rows as CSV with the header line always present.
pub fn to_csv(rows: &[ExportRow]) -> GtModelResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| GtModelError::Export(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| GtModelError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GtModelError::Export(e.to_string()))
}

/// `export_rows` followed by `to_csv`.
pub fn export_csv(data: &GtModelData) -> GtModelResult<String> {
    to_csv(&export_rows(data))
}
