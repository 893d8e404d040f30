//! Error types for grade-tonnage model computation.
//!
//! Validation failures are reported before any computation starts. Computational
//! edge cases (missing distances, zero tonnage weights) are resolved locally by
//! the algorithms and never surface here.

use crate::api::RecordIndex;
use crate::db::repository::RepositoryError;

/// Result type for grade-tonnage model operations.
pub type GtModelResult<T> = Result<T, GtModelError>;

/// Error type for grade-tonnage model operations.
#[derive(Debug, thiserror::Error)]
pub enum GtModelError {
    /// A required column is absent from an input row.
    #[error("Missing required column '{column}' at row {row}")]
    MissingColumn { column: &'static str, row: usize },

    /// A column holds a value of the wrong type or outside its domain.
    #[error("Invalid value for '{column}' at row {row}: {message}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        message: String,
    },

    /// The proximity threshold is negative or not a number.
    #[error("Proximity must be a non-negative number of kilometers, got {0}")]
    NegativeProximity(f64),

    /// Two records share the same index, so the distance cache would be ambiguous.
    #[error("Duplicate record index {0}")]
    DuplicateRecordIndex(RecordIndex),

    /// A distance entry cannot be stored in the cache.
    #[error("Invalid distance between {i} and {j}: {message}")]
    InvalidDistance {
        i: RecordIndex,
        j: RecordIndex,
        message: String,
    },

    /// No commodity was selected for the model.
    #[error("At least one commodity must be selected")]
    NoCommoditySelected,

    /// Unknown representative selection policy name.
    #[error("Unknown representative policy '{0}'. Use first, centroid, or largest.")]
    UnknownRepresentativePolicy(String),

    /// CSV serialization failed.
    #[error("Export error: {0}")]
    Export(String),

    /// The data source failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GtModelError {
    /// Whether this error was caused by caller input rather than by the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::InvalidValue { .. }
                | Self::NegativeProximity(_)
                | Self::DuplicateRecordIndex(_)
                | Self::InvalidDistance { .. }
                | Self::NoCommoditySelected
                | Self::UnknownRepresentativePolicy(_)
        )
    }
}

impl From<csv::Error> for GtModelError {
    fn from(err: csv::Error) -> Self {
        GtModelError::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = GtModelError::MissingColumn {
            column: "total_tonnage",
            row: 3,
        };
        assert_eq!(
            err.to_string(),
            "Missing required column 'total_tonnage' at row 3"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_repository_error_is_not_validation() {
        let err: GtModelError = RepositoryError::internal("boom").into();
        assert!(!err.is_validation());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_negative_proximity_message() {
        let err = GtModelError::NegativeProximity(-2.5);
        assert!(err.to_string().contains("-2.5"));
    }
}
