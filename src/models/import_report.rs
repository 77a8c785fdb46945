//! CSV import report models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row that could not be imported. Never aborts the batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RowImportError {
    /// 1-based index of the data row (the header is not counted)
    pub row: usize,
    pub error: String,
}

/// Outcome of applying one parsed row to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    Created,
    Merged,
}

/// Summary returned by a CSV import.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    /// Rows applied successfully, whether inserted or merged
    pub created: usize,
    /// Subset of `created` that merged into an existing book by ISBN
    pub merged: usize,
    pub errors: Vec<RowImportError>,
}

impl ImportSummary {
    pub fn record(&mut self, action: ImportAction) {
        self.created += 1;
        if action == ImportAction::Merged {
            self.merged += 1;
        }
    }

    pub fn fail(&mut self, row: usize, error: impl Into<String>) {
        self.errors.push(RowImportError {
            row,
            error: error.into(),
        });
    }
}
