use super::normalizer::normalize_text;
use super::parser::empty_string_as_none;
use super::CatalogImportError;
use crate::workflows::labeling::{CompanyId, IndustryLabel, ManualOverrides};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct OverrideRow {
    company_id: String,
    #[serde(default)]
    company_name: String,
    #[serde(
        alias = "industry",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    force_industry: Option<String>,
}

/// Rows with an empty `force_industry` are templates and carry no override.
pub(crate) fn parse_overrides<R: Read>(reader: R) -> Result<ManualOverrides, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut overrides = ManualOverrides::new();

    for (index, row) in csv_reader.deserialize::<OverrideRow>().enumerate() {
        let row = row?;
        let line = index + 2;
        let Some(forced) = row.force_industry else {
            continue;
        };

        let id = normalize_text(&row.company_id)
            .parse::<u64>()
            .map_err(|_| CatalogImportError::InvalidId {
                line,
                value: row.company_id.clone(),
            })?;
        let industry =
            IndustryLabel::parse(&forced).ok_or_else(|| CatalogImportError::UnknownIndustry {
                line,
                value: forced.clone(),
            })?;

        overrides.insert(CompanyId(id), normalize_text(&row.company_name), industry);
    }

    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_force_industry_rows_are_skipped() {
        let csv = "company_id,company_name,force_industry\n1,Alpha,製薬・バイオ\n2,Beta,\n3,Gamma,logistics\n";
        let overrides = parse_overrides(Cursor::new(csv)).expect("parse");

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get(CompanyId(1)), Some(IndustryLabel::PharmaBio));
        assert_eq!(overrides.get(CompanyId(2)), None);
        assert_eq!(overrides.get(CompanyId(3)), Some(IndustryLabel::Logistics));
    }

    #[test]
    fn later_rows_replace_earlier_ones() {
        let csv = "company_id,company_name,force_industry\n1,Alpha,nutrition\n1,Alpha,教育・研修\n";
        let overrides = parse_overrides(Cursor::new(csv)).expect("parse");
        assert_eq!(
            overrides.get(CompanyId(1)),
            Some(IndustryLabel::EducationTraining)
        );
    }

    #[test]
    fn unknown_force_industry_is_rejected() {
        let csv = "company_id,company_name,force_industry\n1,Alpha,space\n";
        let error = parse_overrides(Cursor::new(csv)).expect_err("unknown label");
        assert!(matches!(
            error,
            CatalogImportError::UnknownIndustry { line: 2, .. }
        ));
    }
}
