//! End-to-end labeling runs over a small company table: import, classify,
//! merge overrides, score, enrich and summarize through the public API.

mod common {
    use medfit::workflows::catalog::{CompanyCatalogImporter, OverrideTableImporter};
    use medfit::workflows::labeling::{CompanyRecord, ManualOverrides};

    pub(super) const COMPANIES: &str = include_str!("fixtures/companies_sample.csv");

    pub(super) fn companies() -> Vec<CompanyRecord> {
        CompanyCatalogImporter::from_reader(COMPANIES.as_bytes()).expect("fixture imports")
    }

    pub(super) fn overrides() -> ManualOverrides {
        let csv = "company_id,company_name,force_industry\n5,ミライ商事,医療卸・流通\n";
        OverrideTableImporter::from_reader(csv.as_bytes()).expect("override table imports")
    }

    pub(super) fn record(records: &[CompanyRecord], id: u64) -> &CompanyRecord {
        records
            .iter()
            .find(|record| record.id.0 == id)
            .expect("record present")
    }
}

use common::*;
use medfit::workflows::labeling::{
    keyword_hints, promote_high_confidence, suggest_industries, token_frequency, CompanyId,
    FitScores, IndustryLabel, ManualOverrides, MatchMode, RuleSet, DEFAULT_PROMOTION_THRESHOLD,
};
use medfit::workflows::pipeline::{
    ClassifyScope, OverridePlacement, Pipeline, PipelineConfig, PipelineStage, RelevanceBand,
};

#[test]
fn first_match_run_labels_scores_and_summarizes() {
    let rule_set = RuleSet::standard();
    let overrides = overrides();
    let config = PipelineConfig::standard();
    let run = Pipeline::new(&rule_set, &overrides, &config).run(companies());

    assert_eq!(run.rule_set_version, RuleSet::STANDARD_VERSION);
    assert_eq!(
        run.stages,
        vec![
            PipelineStage::Classify,
            PipelineStage::MergeOverrides,
            PipelineStage::Score,
            PipelineStage::Enrich,
            PipelineStage::Summarize,
        ]
    );

    let labels: Vec<IndustryLabel> = run.records.iter().map(|record| record.industry).collect();
    assert_eq!(
        labels,
        vec![
            IndustryLabel::HealthIt,
            IndustryLabel::MedicalDeviceMaker,
            IndustryLabel::PharmaBio,
            IndustryLabel::CaregivingWelfare,
            IndustryLabel::Distribution,
            IndustryLabel::PharmaBio,
        ]
    );
    assert_eq!(run.relabeled(), 6);
    assert_eq!(run.needs_review().count(), 0);

    assert_eq!(
        record(&run.records, 1).fit,
        Some(FitScores {
            side_job_fit: 90,
            career_shift_fit: 30,
            hybrid_fit: 60,
            learning_growth: 80,
            risk_level: 20,
        })
    );
    assert_eq!(
        record(&run.records, 2).fit,
        Some(FitScores {
            side_job_fit: 75,
            career_shift_fit: 40,
            hybrid_fit: 57,
            learning_growth: 65,
            risk_level: 40,
        })
    );
    assert_eq!(
        record(&run.records, 5).fit,
        Some(FitScores {
            side_job_fit: 25,
            career_shift_fit: 85,
            hybrid_fit: 55,
            learning_growth: 30,
            risk_level: 55,
        })
    );

    let summary = run.summary.expect("summary stage ran");
    assert_eq!(summary.total, 6);
    assert_eq!(summary.unclassified, 0);
    assert_eq!(summary.count_for(IndustryLabel::PharmaBio), 2);
    assert_eq!(summary.label_counts[0].industry, IndustryLabel::PharmaBio);
    assert!((summary.average_relevance - 290.0 / 6.0).abs() < 1e-9);

    let bands: Vec<(RelevanceBand, usize)> = summary
        .relevance_bands
        .iter()
        .map(|entry| (entry.band, entry.count))
        .collect();
    assert_eq!(
        bands,
        vec![
            (RelevanceBand::High, 1),
            (RelevanceBand::Upper, 2),
            (RelevanceBand::Lower, 2),
            (RelevanceBand::Low, 1),
        ]
    );
}

#[test]
fn most_frequent_mode_resolves_mixed_keywords_by_plurality() {
    let rule_set = RuleSet::standard();
    let overrides = ManualOverrides::new();
    let config = PipelineConfig::standard().with_match_mode(MatchMode::MostFrequent);
    let run = Pipeline::new(&rule_set, &overrides, &config).run(companies());

    let logistics = record(&run.records, 6);
    assert_eq!(logistics.industry, IndustryLabel::Logistics);
    assert_eq!(logistics.fit.map(|fit| fit.risk_level), Some(45));

    let outcome = run
        .outcomes
        .iter()
        .find(|outcome| outcome.company_id == CompanyId(6))
        .and_then(|outcome| outcome.classification)
        .expect("classified");
    assert_eq!(outcome.matched_rules, 5);
    assert!((outcome.confidence - 0.95).abs() < f32::EPSILON);

    let unmatched = record(&run.records, 5);
    assert!(unmatched.industry.is_unclassified());
    assert_eq!(run.needs_review().count(), 1);
    let summary = run.summary.expect("summary stage ran");
    assert_eq!(summary.unclassified, 1);
    assert!((summary.unclassified_rate - 1.0 / 6.0).abs() < 1e-9);
}

#[test]
fn override_placement_and_scope_keep_forced_labels() {
    let rule_set = RuleSet::standard();
    let overrides = overrides();

    for placement in [OverridePlacement::BeforeClassify, OverridePlacement::AfterClassify] {
        for scope in [ClassifyScope::All, ClassifyScope::UnclassifiedOnly] {
            let config = PipelineConfig::standard()
                .with_override_placement(placement)
                .with_scope(scope);
            let run = Pipeline::new(&rule_set, &overrides, &config).run(companies());
            assert_eq!(
                record(&run.records, 5).industry,
                IndustryLabel::Distribution,
                "placement {placement:?} scope {scope:?}"
            );
        }
    }
}

#[test]
fn enrichment_fills_background_and_normalizes_descriptions() {
    let rule_set = RuleSet::standard();
    let overrides = overrides();
    let config = PipelineConfig::standard();
    let run = Pipeline::new(&rule_set, &overrides, &config).run(companies());

    let caregiving = record(&run.records, 4);
    assert_eq!(
        caregiving.target_background.as_deref(),
        Some("介護職;看護師;福祉系経験者")
    );
    assert_eq!(
        caregiving.description,
        "介護・福祉サービスを提供し、高齢者支援や在宅ケアを行っています。"
    );

    let plain = PipelineConfig::standard().without_enrichment();
    let run = Pipeline::new(&rule_set, &overrides, &plain).run(companies());
    let untouched = record(&run.records, 4);
    assert_eq!(untouched.description, "在宅介護サービスを提供");
    assert!(untouched.target_background.is_none());
}

#[test]
fn suggestions_promote_confident_labels_into_next_override_table() {
    let rule_set = RuleSet::standard();
    let records = companies();
    let suggestions = suggest_industries(&records, &rule_set);

    assert_eq!(suggestions.len(), 6);
    assert_eq!(suggestions[5].suggested_industry, Some(IndustryLabel::Logistics));
    assert!(suggestions[4].suggested_industry.is_none());
    assert!((suggestions[3].confidence - 0.70).abs() < 1e-6);

    let mut existing = overrides();
    existing.insert(CompanyId(4), "ケアサポート", IndustryLabel::HygieneInfectionControl);
    let promoted = promote_high_confidence(&suggestions, &existing, DEFAULT_PROMOTION_THRESHOLD);

    assert_eq!(promoted.len(), 6);
    assert_eq!(promoted.get(CompanyId(1)), Some(IndustryLabel::HealthIt));
    assert_eq!(promoted.get(CompanyId(6)), Some(IndustryLabel::Logistics));
    assert_eq!(
        promoted.get(CompanyId(4)),
        Some(IndustryLabel::HygieneInfectionControl)
    );
    assert_eq!(promoted.get(CompanyId(5)), Some(IndustryLabel::Distribution));
}

#[test]
fn keyword_hints_map_domain_tokens_to_rule_labels() {
    let rule_set = RuleSet::standard();
    let frequency = token_frequency(&companies());

    assert_eq!(frequency.len(), 14);
    assert!(frequency.iter().all(|entry| entry.count == 1));
    assert_eq!(frequency[0].token, "電子カルテ");

    let hints = keyword_hints(&frequency, &rule_set);
    assert_eq!(hints.len(), 12);
    assert!(hints.iter().all(|hint| hint.token != "電子カルテ" && hint.token != "内視鏡"));
    let data_hint = hints
        .iter()
        .find(|hint| hint.token == "医療データ")
        .expect("hint present");
    assert_eq!(data_hint.suggested_industry, IndustryLabel::HealthIt);
}

#[test]
fn appended_rules_take_effect_on_the_next_run() {
    let mut rule_set = RuleSet::standard();
    let overrides = ManualOverrides::new();
    let config = PipelineConfig::standard();

    let before = Pipeline::new(&rule_set, &overrides, &config).run(companies());
    assert!(record(&before.records, 5).industry.is_unclassified());

    let extra = RuleSet::keyword_rules_from_csv("keyword,industry\n文具,医療卸・流通\n".as_bytes())
        .expect("rules parse");
    assert_eq!(rule_set.append_rules(extra), 1);

    let after = Pipeline::new(&rule_set, &overrides, &config).run(companies());
    assert_eq!(record(&after.records, 5).industry, IndustryLabel::Distribution);
}
