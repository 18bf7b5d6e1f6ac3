use medfit::workflows::catalog::{
    write_companies, write_overrides, CatalogImportError, CompanyCatalogImporter,
    OverrideTableImporter,
};
use medfit::workflows::labeling::{CompanyId, IndustryLabel, ManualOverrides, RuleSet};
use medfit::workflows::pipeline::{Pipeline, PipelineConfig};

const COMPANIES: &str = include_str!("fixtures/companies_sample.csv");

#[test]
fn importer_reads_fixture_rows_and_lists() {
    let records =
        CompanyCatalogImporter::from_reader(COMPANIES.as_bytes()).expect("fixture imports");

    assert_eq!(records.len(), 6);
    let first = &records[0];
    assert_eq!(first.id, CompanyId(1));
    assert_eq!(first.name, "ヘルステック株式会社");
    assert_eq!(first.raw_keywords, vec!["電子カルテ", "医療データ"]);
    assert_eq!(first.raw_domains, vec!["医療IT"]);
    assert_eq!(first.relevance_score, 88);
    assert!(first.fit.is_none());

    let blank = &records[4];
    assert!(blank.raw_keywords.is_empty());
    assert!(blank.raw_domains.is_empty());

    assert!(records.iter().all(|record| record.industry.is_unclassified()));
}

#[test]
fn labeled_table_reimports_with_derived_scores() {
    let records =
        CompanyCatalogImporter::from_reader(COMPANIES.as_bytes()).expect("fixture imports");
    let rule_set = RuleSet::standard();
    let overrides = ManualOverrides::new();
    let config = PipelineConfig::standard();
    let run = Pipeline::new(&rule_set, &overrides, &config).run(records);

    let mut output = Vec::new();
    write_companies(&mut output, &run.records).expect("table writes");
    let text = String::from_utf8(output.clone()).expect("utf-8 output");
    assert!(text.starts_with(
        "company_id,company_name,short_description,raw_medical_keywords,raw_medical_domains,\
         medical_relevance_score,industry,side_job_fit_score,career_shift_fit_score,\
         hybrid_fit_score,learning_growth_score,risk_level,target_background\n"
    ));

    let reimported =
        CompanyCatalogImporter::from_reader(output.as_slice()).expect("output reimports");
    assert_eq!(reimported.len(), run.records.len());
    for (written, read) in run.records.iter().zip(&reimported) {
        assert_eq!(read.industry, written.industry);
        assert_eq!(read.fit, written.fit);
        assert_eq!(read.raw_keywords, written.raw_keywords);
        assert_eq!(read.target_background, written.target_background);
    }
}

#[test]
fn importer_reports_line_of_invalid_id() {
    let csv = "company_id,company_name\n1,ok\n２x,bad\n";
    match CompanyCatalogImporter::from_reader(csv.as_bytes()) {
        Err(CatalogImportError::InvalidId { line, value }) => {
            assert_eq!(line, 3);
            assert_eq!(value, "２x");
        }
        other => panic!("expected invalid id, got {other:?}"),
    }
}

#[test]
fn override_table_survives_write_and_read() {
    let mut overrides = ManualOverrides::new();
    overrides.insert(CompanyId(7), "ナースアカデミー", IndustryLabel::EducationTraining);
    overrides.insert(CompanyId(3), "クリーンメディカル", IndustryLabel::HygieneInfectionControl);

    let mut output = Vec::new();
    write_overrides(&mut output, &overrides).expect("overrides write");
    let text = String::from_utf8(output.clone()).expect("utf-8 output");
    assert!(text.contains("3,クリーンメディカル,衛生・感染対策"));
    assert!(text.contains("7,ナースアカデミー,教育・研修"));

    let reread = OverrideTableImporter::from_reader(output.as_slice()).expect("reread");
    assert_eq!(reread, overrides);
}

#[test]
fn override_table_rejects_unknown_labels() {
    let csv = "company_id,company_name,force_industry\n1,謎の会社,宇宙産業\n";
    assert!(matches!(
        OverrideTableImporter::from_reader(csv.as_bytes()),
        Err(CatalogImportError::UnknownIndustry { line: 2, .. })
    ));
}
