use medfit::config::DataConfig;
use medfit::error::AppError;
use medfit::workflows::catalog::{CompanyCatalogImporter, OverrideTableImporter};
use medfit::workflows::diagnosis::{SurveyAnswerSet, QUESTION_COUNT};
use medfit::workflows::labeling::{CompanyRecord, ManualOverrides, MatchMode, RuleSet};
use medfit::workflows::pipeline::{
    ClassifyScope, CompanyDirectory, Pipeline, PipelineConfig, PipelineRun,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) labeling: Arc<LabelingContext>,
}

/// Rule set, override table and stage configuration shared by the label endpoint.
#[derive(Debug, Clone)]
pub(crate) struct LabelingContext {
    pub(crate) rule_set: RuleSet,
    pub(crate) overrides: ManualOverrides,
    pub(crate) pipeline: PipelineConfig,
}

impl LabelingContext {
    pub(crate) fn from_config(data: &DataConfig) -> Result<Self, AppError> {
        let rule_set = data.load_rule_set()?;
        let overrides = load_overrides(data.overrides_csv.as_deref())?;
        Ok(Self {
            rule_set,
            overrides,
            pipeline: PipelineConfig::standard().with_match_mode(data.match_mode),
        })
    }

    pub(crate) fn run(&self, records: Vec<CompanyRecord>) -> PipelineRun {
        Pipeline::new(&self.rule_set, &self.overrides, &self.pipeline).run(records)
    }
}

pub(crate) fn load_overrides(path: Option<&Path>) -> Result<ManualOverrides, AppError> {
    match path {
        Some(path) => {
            let overrides = OverrideTableImporter::from_path(path)?;
            info!(path = %path.display(), entries = overrides.len(), "loaded override table");
            Ok(overrides)
        }
        None => Ok(ManualOverrides::new()),
    }
}

/// Loads the company table. Tables that already carry derived scores are
/// served as-is; otherwise unlabeled rows are classified and every row scored.
pub(crate) fn load_directory(
    path: &Path,
    labeling: &LabelingContext,
) -> Result<CompanyDirectory, AppError> {
    let records = CompanyCatalogImporter::from_path(path)?;

    if !records.is_empty() && records.iter().all(|record| record.fit.is_some()) {
        info!(path = %path.display(), companies = records.len(), "loaded scored company table");
        return Ok(CompanyDirectory::new(records));
    }

    let config = labeling
        .pipeline
        .clone()
        .with_scope(ClassifyScope::UnclassifiedOnly)
        .without_enrichment();
    let run = Pipeline::new(&labeling.rule_set, &labeling.overrides, &config).run(records);
    let pending = run.needs_review().count();
    if pending > 0 {
        warn!(pending, "companies remain unclassified after labeling");
    }
    info!(
        path = %path.display(),
        companies = run.records.len(),
        rule_set = %run.rule_set_version,
        "labeled company table at startup"
    );
    Ok(run.into_directory())
}

pub(crate) fn parse_match_mode(raw: &str) -> Result<MatchMode, String> {
    raw.parse::<MatchMode>().map_err(|err| err.to_string())
}

/// Parses a comma- or space-separated list of 0/1 answers for questions 1..=20.
pub(crate) fn parse_answers(raw: &str) -> Result<SurveyAnswerSet, String> {
    let values = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|err| format!("answer '{token}' is not an integer ({err})"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() > usize::from(QUESTION_COUNT) {
        return Err(format!(
            "expected at most {QUESTION_COUNT} answers, got {}",
            values.len()
        ));
    }

    Ok(SurveyAnswerSet::from_sequence(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_accept_commas_and_spaces() {
        let answers = parse_answers("1,0, 1 1").expect("valid answers");
        assert_eq!(answers.len(), 4);
        assert!(answers.is_yes(1));
        assert!(!answers.is_yes(2));
        assert!(answers.is_yes(4));
    }

    #[test]
    fn answers_reject_overflow_and_garbage() {
        let too_many = vec!["1"; 21].join(",");
        assert!(parse_answers(&too_many).is_err());
        assert!(parse_answers("1,yes").is_err());
    }

    #[test]
    fn match_mode_parser_reports_unknown_values() {
        assert_eq!(parse_match_mode("frequent"), Ok(MatchMode::MostFrequent));
        assert!(parse_match_mode("random").is_err());
    }
}
