//! Repository trait for the deposit data source.
//!
//! The grade-tonnage core never fetches data itself; a [`DepositRepository`]
//! hands it already-resolved records, distances and dictionaries.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::CommodityInfo;
use crate::models::{CommodityDictionary, DepositRecord, DistanceCache};

#[async_trait]
pub trait DepositRepository: Send + Sync {
    /// Check that the data source is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Commodities that have at least one site.
    async fn list_commodities(&self) -> RepositoryResult<Vec<CommodityInfo>>;

    /// Records for the given commodities (codes or display names, case
    /// insensitive), indexed contiguously from zero.
    async fn fetch_deposit_records(
        &self,
        commodities: &[String],
    ) -> RepositoryResult<Vec<DepositRecord>>;

    /// Pairwise distances covering every pair needed within a deposit-type group.
    async fn fetch_distance_cache(
        &self,
        records: &[DepositRecord],
    ) -> RepositoryResult<DistanceCache>;

    async fn fetch_commodity_dictionary(&self) -> RepositoryResult<CommodityDictionary>;
}
