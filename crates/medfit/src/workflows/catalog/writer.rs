use super::CatalogImportError;
use crate::workflows::labeling::{
    CompanyRecord, KeywordHint, ManualOverrides, Suggestion, TokenCount,
};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CompanyOutputRow<'a> {
    company_id: u64,
    company_name: &'a str,
    short_description: &'a str,
    raw_medical_keywords: String,
    raw_medical_domains: String,
    medical_relevance_score: u8,
    industry: &'static str,
    side_job_fit_score: Option<u8>,
    career_shift_fit_score: Option<u8>,
    hybrid_fit_score: Option<u8>,
    learning_growth_score: Option<u8>,
    risk_level: Option<u8>,
    target_background: Option<&'a str>,
}

impl<'a> From<&'a CompanyRecord> for CompanyOutputRow<'a> {
    fn from(record: &'a CompanyRecord) -> Self {
        Self {
            company_id: record.id.0,
            company_name: &record.name,
            short_description: &record.description,
            raw_medical_keywords: record.raw_keywords.join(";"),
            raw_medical_domains: record.raw_domains.join(";"),
            medical_relevance_score: record.relevance_score,
            industry: record.industry.label(),
            side_job_fit_score: record.fit.map(|fit| fit.side_job_fit),
            career_shift_fit_score: record.fit.map(|fit| fit.career_shift_fit),
            hybrid_fit_score: record.fit.map(|fit| fit.hybrid_fit),
            learning_growth_score: record.fit.map(|fit| fit.learning_growth),
            risk_level: record.fit.map(|fit| fit.risk_level),
            target_background: record.target_background.as_deref(),
        }
    }
}

/// Writes the company table in the same column layout the importer reads.
pub fn write_companies<W: Write>(
    writer: W,
    records: &[CompanyRecord],
) -> Result<(), CatalogImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CompanyOutputRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct OverrideOutputRow<'a> {
    company_id: u64,
    company_name: &'a str,
    force_industry: &'static str,
}

pub fn write_overrides<W: Write>(
    writer: W,
    overrides: &ManualOverrides,
) -> Result<(), CatalogImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (id, entry) in overrides.iter() {
        csv_writer.serialize(OverrideOutputRow {
            company_id: id.0,
            company_name: &entry.company_name,
            force_industry: entry.industry.label(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SuggestionOutputRow<'a> {
    company_id: u64,
    company_name: &'a str,
    suggested_industry: &'static str,
    confidence: String,
    note: &'a str,
}

pub fn write_suggestions<W: Write>(
    writer: W,
    suggestions: &[Suggestion],
) -> Result<(), CatalogImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for suggestion in suggestions {
        csv_writer.serialize(SuggestionOutputRow {
            company_id: suggestion.company_id.0,
            company_name: &suggestion.company_name,
            suggested_industry: suggestion
                .suggested_industry
                .map(|industry| industry.label())
                .unwrap_or_default(),
            confidence: format!("{:.2}", suggestion.confidence),
            note: &suggestion.note,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_keyword_frequency<W: Write>(
    writer: W,
    frequency: &[TokenCount],
) -> Result<(), CatalogImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in frequency {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct HintOutputRow<'a> {
    keyword: &'a str,
    count: usize,
    suggested_industry: &'static str,
}

pub fn write_keyword_hints<W: Write>(
    writer: W,
    hints: &[KeywordHint],
) -> Result<(), CatalogImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for hint in hints {
        csv_writer.serialize(HintOutputRow {
            keyword: &hint.token,
            count: hint.count,
            suggested_industry: hint.suggested_industry.label(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
