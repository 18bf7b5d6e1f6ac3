//! CSV adapters for the company table, the override table and the
//! suggestion/keyword reports.

mod normalizer;
mod overrides;
mod parser;
mod writer;

use crate::workflows::labeling::{CompanyRecord, ManualOverrides};
use std::io::Read;
use std::path::Path;

pub use writer::{
    write_companies, write_keyword_frequency, write_keyword_hints, write_overrides,
    write_suggestions,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read company table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid company CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: company_id '{value}' is not a non-negative integer")]
    InvalidId { line: usize, value: String },
    #[error("line {line}: unknown industry '{value}'")]
    UnknownIndustry { line: usize, value: String },
}

pub struct CompanyCatalogImporter;

impl CompanyCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CompanyRecord>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CompanyRecord>, CatalogImportError> {
        let records = parser::parse_companies(reader)?;
        tracing::debug!(records = records.len(), "imported company table");
        Ok(records)
    }
}

pub struct OverrideTableImporter;

impl OverrideTableImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ManualOverrides, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ManualOverrides, CatalogImportError> {
        overrides::parse_overrides(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = CompanyCatalogImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            CatalogImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn override_importer_from_path_propagates_io_errors() {
        assert!(matches!(
            OverrideTableImporter::from_path("./missing-overrides.csv"),
            Err(CatalogImportError::Io(_))
        ));
    }
}
