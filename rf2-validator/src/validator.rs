//! Column validators and the catalogue mapping column headers to them.

use std::collections::HashMap;

use rf2::{IdentifierScheme, IssueAcceptor};
use rf2_id::Rf2IdError;

use crate::config::ValidationConfig;
use crate::error::CatalogueError;

/// Columns holding an SCTID in every content type.
pub const SCTID_COLUMNS: &[&str] = &[
    "moduleId",
    "definitionStatusId",
    "conceptId",
    "caseSignificanceId",
    "typeId",
    "sourceId",
    "destinationId",
    "characteristicTypeId",
    "modifierId",
    "refsetId",
    "referencedComponentId",
    "acceptabilityId",
    "valueId",
    "targetComponentId",
];

/// Column holding the row identifier, whose scheme depends on the content type.
pub const ID_COLUMN: &str = "id";

pub const EFFECTIVE_TIME_COLUMN: &str = "effectiveTime";

pub const STATUS_COLUMN: &str = "active";

/// A check applied to every value of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValidator {
    /// SCTID format and check digit, or a hyphenated UUID.
    Identifier(IdentifierScheme),
    /// Empty (when unpublished content is allowed) or a `YYYYMMDD` date.
    EffectiveTime,
    /// `0` or `1`.
    Status,
    /// Accepts everything.
    Noop,
}

impl ColumnValidator {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Identifier(IdentifierScheme::Sctid) => "SCTID",
            Self::Identifier(IdentifierScheme::Uuid) => "UUID",
            Self::EffectiveTime => "effective time",
            Self::Status => "status",
            Self::Noop => "no-op",
        }
    }

    /// # Errors
    /// Returns the rule `value` breaks.
    pub fn check(self, value: &str, config: &ValidationConfig) -> Result<(), Rf2IdError> {
        match self {
            Self::Identifier(IdentifierScheme::Sctid) => rf2_id::validate_sctid(value).map(drop),
            Self::Identifier(IdentifierScheme::Uuid) => {
                rf2_id::validate_member_uuid(value).map(drop)
            }
            Self::EffectiveTime => {
                rf2_id::validate_effective_time(value, config.allow_unpublished).map(drop)
            }
            Self::Status => rf2_id::validate_status(value).map(drop),
            Self::Noop => Ok(()),
        }
    }
}

/// One catalogue entry: a validator and the column headers it covers.
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    pub validator: ColumnValidator,
    pub columns: Vec<String>,
}

impl CatalogueEntry {
    #[must_use]
    pub fn new(validator: ColumnValidator, columns: &[&str]) -> Self {
        Self {
            validator,
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

/// Column header to validator table, built once per identifier scheme.
#[derive(Debug, Clone, Default)]
pub struct ValidatorCatalogue {
    by_column: HashMap<String, ColumnValidator>,
}

impl ValidatorCatalogue {
    /// Flatten `entries` into a lookup table.
    ///
    /// # Errors
    /// Returns [`CatalogueError::DuplicateColumn`] if two entries claim one column.
    pub fn new(
        entries: impl IntoIterator<Item = CatalogueEntry>,
    ) -> Result<Self, CatalogueError> {
        let mut by_column = HashMap::new();
        for entry in entries {
            for column in entry.columns {
                if let Some(first) = by_column.get(&column) {
                    return Err(CatalogueError::DuplicateColumn {
                        column,
                        first: ColumnValidator::name(*first),
                        second: entry.validator.name(),
                    });
                }
                by_column.insert(column, entry.validator);
            }
        }
        Ok(Self { by_column })
    }

    /// The built-in validators for files whose `id` column follows `scheme`.
    ///
    /// # Errors
    /// See [`ValidatorCatalogue::new`].
    pub fn builtin(scheme: IdentifierScheme) -> Result<Self, CatalogueError> {
        Self::new([
            CatalogueEntry::new(ColumnValidator::Identifier(scheme), &[ID_COLUMN]),
            CatalogueEntry::new(
                ColumnValidator::Identifier(IdentifierScheme::Sctid),
                SCTID_COLUMNS,
            ),
            CatalogueEntry::new(ColumnValidator::EffectiveTime, &[EFFECTIVE_TIME_COLUMN]),
            CatalogueEntry::new(ColumnValidator::Status, &[STATUS_COLUMN]),
        ])
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<ColumnValidator> {
        self.by_column.get(column).copied()
    }

    /// Assign a validator to every position of `header`.
    ///
    /// Each column without a registered validator is reported once as a
    /// warning and gets [`ColumnValidator::Noop`].
    pub fn resolve(
        &self,
        header: &[String],
        acceptor: &dyn IssueAcceptor,
    ) -> Vec<ColumnValidator> {
        header
            .iter()
            .map(|column| {
                self.get(column).unwrap_or_else(|| {
                    acceptor.warn(format!(
                        "No validator is registered for column header '{column}'"
                    ));
                    ColumnValidator::Noop
                })
            })
            .collect()
    }
}
