//! Repository factory for dependency injection.
//!
//! Creates repository instances from the `[repository]` configuration section.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{DepositRepository, RepositoryError, RepositoryResult};
use crate::config::RepositorySettings;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepositoryType {
    /// In-memory local repository, optionally seeded from a snapshot file
    #[default]
    Local,
}

impl FromStr for RepositoryType {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" | "snapshot" => Ok(Self::Local),
            _ => Err(RepositoryError::configuration(format!(
                "Unknown repository type: {}",
                s
            ))),
        }
    }
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn DepositRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository described by the configuration.
    pub fn from_settings(
        settings: &RepositorySettings,
    ) -> RepositoryResult<Arc<dyn DepositRepository>> {
        match settings.repo_type.parse::<RepositoryType>()? {
            RepositoryType::Local => match &settings.snapshot_path {
                Some(path) => Ok(Arc::new(LocalRepository::from_snapshot_file(path)?)),
                None => {
                    log::warn!("No snapshot configured; starting with an empty local repository");
                    Ok(Self::create_local())
                }
            },
        }
    }
}
