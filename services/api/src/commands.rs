use crate::infra::{load_directory, load_overrides, parse_answers, parse_match_mode, LabelingContext};
use clap::Args;
use medfit::config::AppConfig;
use medfit::error::AppError;
use medfit::workflows::catalog::{
    write_companies, write_keyword_frequency, write_keyword_hints, write_overrides,
    write_suggestions, CompanyCatalogImporter,
};
use medfit::workflows::diagnosis::{diagnose, SurveyAnswerSet, ThinkingType};
use medfit::workflows::labeling::{
    keyword_hints, promote_high_confidence, suggest_industries, token_frequency, MatchMode,
    DEFAULT_PROMOTION_THRESHOLD,
};
use medfit::workflows::pipeline::{
    render_pitch, render_recommendations, render_survey_reply, CatalogSummary, ClassifyScope,
    OverridePlacement, PipelineConfig,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct LabelArgs {
    /// Company table to label (defaults to MEDFIT_COMPANIES_CSV)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Where to write the labeled table (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Manual override table (defaults to MEDFIT_OVERRIDES_CSV)
    #[arg(long)]
    pub(crate) overrides: Option<PathBuf>,
    /// Keyword conflict resolution: first | frequent
    #[arg(long, value_parser = parse_match_mode)]
    pub(crate) match_mode: Option<MatchMode>,
    /// Only relabel rows that are currently unclassified
    #[arg(long)]
    pub(crate) unclassified_only: bool,
    /// Merge the override table before keyword classification
    #[arg(long)]
    pub(crate) overrides_before: bool,
    /// Keep descriptions as imported and leave target backgrounds blank
    #[arg(long)]
    pub(crate) no_enrich: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SuggestArgs {
    /// Company table to inspect (defaults to MEDFIT_COMPANIES_CSV)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Where to write the suggestion list (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Write the next override table, with confident suggestions promoted
    #[arg(long)]
    pub(crate) promote_to: Option<PathBuf>,
    /// Minimum confidence for promotion
    #[arg(long, default_value_t = DEFAULT_PROMOTION_THRESHOLD)]
    pub(crate) threshold: f32,
}

#[derive(Args, Debug, Default)]
pub(crate) struct KeywordsArgs {
    /// Company table to inspect (defaults to MEDFIT_COMPANIES_CSV)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Write the full token frequency table
    #[arg(long)]
    pub(crate) frequency_out: Option<PathBuf>,
    /// Write tokens that contain a known rule keyword
    #[arg(long)]
    pub(crate) hints_out: Option<PathBuf>,
    /// Number of tokens to print
    #[arg(long, default_value_t = 20)]
    pub(crate) top: usize,
}

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// Answers for questions 1..=20 in order, e.g. "1,0,1,..." (1 = yes)
    #[arg(long, value_parser = parse_answers)]
    pub(crate) answers: SurveyAnswerSet,
    /// Scored company table used for recommendations (defaults to MEDFIT_COMPANIES_CSV)
    #[arg(long)]
    pub(crate) companies: Option<PathBuf>,
    /// Print the diagnosis as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// Rank by the fit score of this thinking type instead of the composite score
    #[arg(long)]
    pub(crate) thinking_type: Option<ThinkingType>,
    /// Company table to rank (defaults to MEDFIT_COMPANIES_CSV)
    #[arg(long)]
    pub(crate) companies: Option<PathBuf>,
    /// Print a short pitch for every recommendation
    #[arg(long)]
    pub(crate) pitch: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SummaryArgs {
    /// Company table to summarize (defaults to MEDFIT_COMPANIES_CSV)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
}

pub(crate) fn run_label(args: LabelArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let input = args
        .input
        .unwrap_or_else(|| config.data.companies_csv.clone());
    let overrides_path = args.overrides.or_else(|| config.data.overrides_csv.clone());

    let mut pipeline = PipelineConfig::standard()
        .with_match_mode(args.match_mode.unwrap_or(config.data.match_mode));
    if args.unclassified_only {
        pipeline = pipeline.with_scope(ClassifyScope::UnclassifiedOnly);
    }
    if args.overrides_before {
        pipeline = pipeline.with_override_placement(OverridePlacement::BeforeClassify);
    }
    if args.no_enrich {
        pipeline = pipeline.without_enrichment();
    }

    let labeling = LabelingContext {
        rule_set: config.data.load_rule_set()?,
        overrides: load_overrides(overrides_path.as_deref())?,
        pipeline,
    };
    let records = CompanyCatalogImporter::from_path(&input)?;
    let run = labeling.run(records);

    match args.output {
        Some(path) => {
            write_companies(File::create(&path)?, &run.records)?;
            println!(
                "Labeled {} companies with rule set {} -> {}",
                run.records.len(),
                run.rule_set_version,
                path.display()
            );
            println!(
                "- stages: {}",
                run.stages
                    .iter()
                    .map(|stage| stage.label())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            );
            println!("- relabeled: {}", run.relabeled());
            println!("- needs review: {}", run.needs_review().count());
            if let Some(summary) = &run.summary {
                println!("\n{summary}");
            }
        }
        None => write_companies(io::stdout().lock(), &run.records)?,
    }

    Ok(())
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let input = args.input.unwrap_or_else(|| config.data.companies_csv.clone());
    let rule_set = config.data.load_rule_set()?;
    let records = CompanyCatalogImporter::from_path(&input)?;
    let suggestions = suggest_industries(&records, &rule_set);

    match &args.output {
        Some(path) => write_suggestions(File::create(path)?, &suggestions)?,
        None => write_suggestions(io::stdout().lock(), &suggestions)?,
    }

    if let Some(path) = args.promote_to {
        let existing = load_overrides(config.data.overrides_csv.as_deref())?;
        let promoted = promote_high_confidence(&suggestions, &existing, args.threshold);
        write_overrides(File::create(&path)?, &promoted)?;
        eprintln!(
            "Promoted {} override entries (threshold {:.2}) -> {}",
            promoted.len(),
            args.threshold,
            path.display()
        );
    }

    Ok(())
}

pub(crate) fn run_keywords(args: KeywordsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let input = args.input.unwrap_or_else(|| config.data.companies_csv.clone());
    let rule_set = config.data.load_rule_set()?;
    let records = CompanyCatalogImporter::from_path(&input)?;

    let frequency = token_frequency(&records);
    let hints = keyword_hints(&frequency, &rule_set);

    println!("Most frequent keyword/domain tokens ({} distinct)", frequency.len());
    for entry in frequency.iter().take(args.top) {
        println!("- {}: {}", entry.token, entry.count);
    }
    println!("\nTokens matching rule set {} ({})", rule_set.version, hints.len());
    for hint in hints.iter().take(args.top) {
        println!(
            "- {} ({}) -> {}",
            hint.token,
            hint.count,
            hint.suggested_industry.label()
        );
    }

    if let Some(path) = &args.frequency_out {
        write_keyword_frequency(File::create(path)?, &frequency)?;
    }
    if let Some(path) = &args.hints_out {
        write_keyword_hints(File::create(path)?, &hints)?;
    }

    Ok(())
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let result = diagnose(&args.answers);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|err| AppError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))?;
        println!("{json}");
    } else {
        println!("診断結果：{}", result.summary_label);
        println!(
            "- A/B/C/D: {}/{}/{}/{}",
            result.scores.a_score, result.scores.b_score, result.scores.c_score, result.scores.d_score
        );
    }

    let config = AppConfig::load()?;
    // The default table is optional here; an explicit path must exist.
    let path = match args.companies {
        Some(path) => path,
        None if config.data.companies_csv.exists() => config.data.companies_csv.clone(),
        None => return Ok(()),
    };
    let labeling = LabelingContext::from_config(&config.data)?;
    let directory = load_directory(&path, &labeling)?;
    let picked = directory.pick_for_thinking_type(result.thinking_type);
    println!("\n{}", render_recommendations(&picked));

    Ok(())
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args
        .companies
        .unwrap_or_else(|| config.data.companies_csv.clone());
    let labeling = LabelingContext::from_config(&config.data)?;
    let directory = load_directory(&path, &labeling)?;

    let picked = match args.thinking_type {
        Some(thinking_type) => {
            let picked = directory.pick_for_thinking_type(thinking_type);
            println!("{}", render_recommendations(&picked));
            picked
        }
        None => {
            let ranked = directory.rank_by_composite();
            println!("{}", render_survey_reply(&ranked));
            ranked
        }
    };

    if args.pitch {
        for record in picked {
            println!("\n{}", render_pitch(record));
        }
    }

    Ok(())
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let input = args.input.unwrap_or(config.data.companies_csv);
    let records = CompanyCatalogImporter::from_path(&input)?;
    let summary = CatalogSummary::from_records(&records);

    print!("{summary}");
    io::stdout().flush()?;
    Ok(())
}
