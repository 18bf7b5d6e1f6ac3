//! Batch labeling pipeline: named stages run in an explicit order over a
//! company table, with classification and scoring fanned out on rayon.

mod selection;
mod summary;


use crate::workflows::labeling::{
    profile, Classification, ClassificationSource, CompanyId, CompanyRecord, FitScorer,
    IndustryClassifier, IndustryLabel, ManualOverrides, MatchMode, RuleSet,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use selection::{
    composite_score, fit_for_thinking_type, render_pitch, render_recommendations,
    render_survey_reply, CandidateScreen, CompanyDirectory, RECOMMENDATION_COUNT,
};
pub use summary::{BandCount, CatalogSummary, LabelCount, RelevanceBand};

/// Unclassified share above which the summary stage warns.
pub const DEFAULT_UNCLASSIFIED_WARN_RATE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Classify,
    MergeOverrides,
    Score,
    Enrich,
    Summarize,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::MergeOverrides => "merge_overrides",
            Self::Score => "score",
            Self::Enrich => "enrich",
            Self::Summarize => "summarize",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether forced labels are written before or after keyword classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePlacement {
    BeforeClassify,
    #[default]
    AfterClassify,
}

/// Which records the classify stage is allowed to relabel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyScope {
    #[default]
    All,
    UnclassifiedOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub match_mode: MatchMode,
    pub scope: ClassifyScope,
    pub override_placement: OverridePlacement,
    pub enrich_profiles: bool,
    pub summarize: bool,
    pub unclassified_warn_rate: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl PipelineConfig {
    pub fn standard() -> Self {
        Self {
            match_mode: MatchMode::FirstMatch,
            scope: ClassifyScope::All,
            override_placement: OverridePlacement::AfterClassify,
            enrich_profiles: true,
            summarize: true,
            unclassified_warn_rate: DEFAULT_UNCLASSIFIED_WARN_RATE,
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_scope(mut self, scope: ClassifyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_override_placement(mut self, placement: OverridePlacement) -> Self {
        self.override_placement = placement;
        self
    }

    pub fn without_enrichment(mut self) -> Self {
        self.enrich_profiles = false;
        self
    }

    /// Stage order implied by this configuration.
    pub fn stages(&self) -> Vec<PipelineStage> {
        let mut stages = match self.override_placement {
            OverridePlacement::BeforeClassify => {
                vec![PipelineStage::MergeOverrides, PipelineStage::Classify]
            }
            OverridePlacement::AfterClassify => {
                vec![PipelineStage::Classify, PipelineStage::MergeOverrides]
            }
        };
        stages.push(PipelineStage::Score);
        if self.enrich_profiles {
            stages.push(PipelineStage::Enrich);
        }
        if self.summarize {
            stages.push(PipelineStage::Summarize);
        }
        stages
    }
}

/// What happened to one record's label during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOutcome {
    pub company_id: CompanyId,
    pub previous: IndustryLabel,
    /// `None` when no stage touched the label.
    pub classification: Option<Classification>,
}

impl LabelOutcome {
    pub fn changed(&self) -> bool {
        self.classification
            .is_some_and(|classification| classification.industry != self.previous)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub rule_set_version: String,
    pub stages: Vec<PipelineStage>,
    pub records: Vec<CompanyRecord>,
    pub outcomes: Vec<LabelOutcome>,
    pub summary: Option<CatalogSummary>,
}

impl PipelineRun {
    pub fn needs_review(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records
            .iter()
            .filter(|record| record.industry.is_unclassified())
    }

    pub fn relabeled(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.changed()).count()
    }

    pub fn into_directory(self) -> CompanyDirectory {
        CompanyDirectory::new(self.records)
    }
}

/// Runs the configured stages with an explicitly passed rule set and
/// override table. Neither is mutated.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    rule_set: &'a RuleSet,
    overrides: &'a ManualOverrides,
    config: &'a PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        rule_set: &'a RuleSet,
        overrides: &'a ManualOverrides,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            rule_set,
            overrides,
            config,
        }
    }

    pub fn run(&self, records: Vec<CompanyRecord>) -> PipelineRun {
        let mut records = records;
        let mut outcomes: Vec<LabelOutcome> = records
            .iter()
            .map(|record| LabelOutcome {
                company_id: record.id,
                previous: record.industry,
                classification: None,
            })
            .collect();
        let stages = self.config.stages();
        let mut summary = None;

        tracing::info!(
            records = records.len(),
            rule_set = %self.rule_set.version,
            match_mode = %self.config.match_mode,
            "starting labeling pipeline"
        );

        for stage in &stages {
            match stage {
                PipelineStage::Classify => self.classify(&mut records, &mut outcomes),
                PipelineStage::MergeOverrides => self.merge_overrides(&mut records, &mut outcomes),
                PipelineStage::Score => self.score(&mut records),
                PipelineStage::Enrich => records.par_iter_mut().for_each(profile::enrich_record),
                PipelineStage::Summarize => summary = Some(self.summarize(&records)),
            }
            tracing::debug!(stage = %stage, "pipeline stage finished");
        }

        PipelineRun {
            rule_set_version: self.rule_set.version.clone(),
            stages,
            records,
            outcomes,
            summary,
        }
    }

    fn classify(&self, records: &mut [CompanyRecord], outcomes: &mut [LabelOutcome]) {
        let classifier = IndustryClassifier::new(self.rule_set, self.config.match_mode);
        let scope = self.config.scope;
        let overrides = self.overrides;

        records
            .par_iter_mut()
            .zip(outcomes.par_iter_mut())
            .filter(|(record, _)| {
                scope == ClassifyScope::All || record.industry.is_unclassified()
            })
            .for_each(|(record, outcome)| {
                let classification = classifier.classify(record, overrides);
                record.industry = classification.industry;
                outcome.classification = Some(classification);
            });

        let matched = outcomes
            .iter()
            .filter_map(|outcome| outcome.classification)
            .filter(|classification| classification.source == ClassificationSource::Keywords)
            .count();
        tracing::debug!(matched, "keyword classification complete");
    }

    fn merge_overrides(&self, records: &mut [CompanyRecord], outcomes: &mut [LabelOutcome]) {
        let mut applied = 0usize;
        for (record, outcome) in records.iter_mut().zip(outcomes.iter_mut()) {
            if let Some(industry) = self.overrides.get(record.id) {
                record.industry = industry;
                outcome.classification = Some(Classification::forced(industry));
                applied += 1;
            }
        }
        tracing::debug!(applied, "manual overrides merged");
    }

    fn score(&self, records: &mut [CompanyRecord]) {
        let scorer = FitScorer::new(self.rule_set);
        records.par_iter_mut().for_each(|record| {
            scorer.score_record(record);
        });
    }

    fn summarize(&self, records: &[CompanyRecord]) -> CatalogSummary {
        let summary = CatalogSummary::from_records(records);
        if summary.total > 0 && summary.unclassified_rate > self.config.unclassified_warn_rate {
            tracing::warn!(
                unclassified = summary.unclassified,
                total = summary.total,
                rate = summary.unclassified_rate,
                "high unclassified rate; review the keyword rules or the override table"
            );
        } else {
            tracing::info!(
                total = summary.total,
                unclassified = summary.unclassified,
                "catalog summary ready"
            );
        }
        summary
    }
}
