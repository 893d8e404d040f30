//! High-level data-source service layer.
//!
//! Repository-agnostic operations shared by the HTTP handlers and the model
//! services. They work with any [`DepositRepository`] implementation.
//!
//! # Usage
//!
//! ```no_run
//! use gtm_rust::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let commodities = services::list_commodities(&repo).await?;
//!     println!("Found {} commodities", commodities.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use super::repository::{DepositRepository, RepositoryResult};
use crate::api::CommodityInfo;
use crate::models::{CommodityDictionary, DepositRecord, DistanceCache};
use crate::services::commodities::commodity_group_entries;

/// Everything the model needs for one request.
#[derive(Debug, Clone, Default)]
pub struct ModelInputs {
    pub records: Vec<DepositRecord>,
    pub distances: DistanceCache,
    pub dictionary: CommodityDictionary,
}

// ==================== Health & Listing ====================

/// Check if the data source is healthy.
pub async fn health_check<R: DepositRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Commodities known to the data source followed by the group aliases.
pub async fn list_commodities<R: DepositRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<CommodityInfo>> {
    let mut commodities = repo.list_commodities().await?;
    commodities.extend(commodity_group_entries());
    Ok(commodities)
}

// ==================== Model Inputs ====================

/// Fetch records, distances and the commodity dictionary for already-expanded
/// commodity selections.
pub async fn load_model_inputs<R: DepositRepository + ?Sized>(
    repo: &R,
    commodities: &[String],
) -> RepositoryResult<ModelInputs> {
    let records = repo.fetch_deposit_records(commodities).await?;
    let distances = repo.fetch_distance_cache(&records).await?;
    let dictionary = repo.fetch_commodity_dictionary().await?;

    debug!(
        "Fetched {} records and {} distances for {:?}",
        records.len(),
        distances.len(),
        commodities
    );
    if records.is_empty() {
        info!("No deposit records for {:?}", commodities);
    }

    Ok(ModelInputs {
        records,
        distances,
        dictionary,
    })
}
