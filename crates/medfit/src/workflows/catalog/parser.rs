use super::normalizer::{normalize_text, split_list};
use super::CatalogImportError;
use crate::workflows::labeling::{parse_relevance, CompanyRecord, FitScores, IndustryLabel};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_companies<R: Read>(reader: R) -> Result<Vec<CompanyRecord>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<CompanyRow>().enumerate() {
        let row = row?;
        // Header is line 1.
        records.push(row.into_record(index + 2)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    company_id: String,
    #[serde(alias = "name", default)]
    company_name: String,
    #[serde(alias = "description", default)]
    short_description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    raw_medical_keywords: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    raw_medical_domains: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    medical_relevance_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    side_job_fit_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    career_shift_fit_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    hybrid_fit_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    learning_growth_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    risk_level: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    target_background: Option<String>,
}

impl CompanyRow {
    fn into_record(self, line: usize) -> Result<CompanyRecord, CatalogImportError> {
        let id = normalize_text(&self.company_id)
            .parse::<u64>()
            .map_err(|_| CatalogImportError::InvalidId {
                line,
                value: self.company_id.clone(),
            })?;

        let industry = match self.industry.as_deref() {
            None => IndustryLabel::Unclassified,
            Some(raw) => IndustryLabel::parse(&normalize_text(raw)).unwrap_or_else(|| {
                tracing::warn!(company_id = id, industry = raw, "unknown industry label; treating as unclassified");
                IndustryLabel::Unclassified
            }),
        };

        let fit = self.fit_scores();
        let mut record = CompanyRecord::new(
            id,
            normalize_text(&self.company_name),
            normalize_text(&self.short_description),
        );
        record.raw_keywords = self
            .raw_medical_keywords
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        record.raw_domains = self
            .raw_medical_domains
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        record.relevance_score = parse_relevance(self.medical_relevance_score.as_deref());
        record.industry = industry;
        record.fit = fit;
        record.target_background = self.target_background.map(|value| normalize_text(&value));

        Ok(record)
    }

    /// Derived columns are only trusted when the full set is present.
    fn fit_scores(&self) -> Option<FitScores> {
        let side_job_fit = self.side_job_fit_score.as_deref()?;
        let career_shift_fit = self.career_shift_fit_score.as_deref()?;
        let hybrid_fit = self.hybrid_fit_score.as_deref()?;
        let learning_growth = self.learning_growth_score.as_deref()?;
        let risk_level = self.risk_level.as_deref()?;

        Some(FitScores {
            side_job_fit: parse_relevance(Some(side_job_fit)),
            career_shift_fit: parse_relevance(Some(career_shift_fit)),
            hybrid_fit: parse_relevance(Some(hybrid_fit)),
            learning_growth: parse_relevance(Some(learning_growth)),
            risk_level: parse_relevance(Some(risk_level)),
        })
    }
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
