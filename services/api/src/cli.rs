use crate::commands::{
    run_diagnose, run_keywords, run_label, run_recommend, run_suggest, run_summary, DiagnoseArgs,
    KeywordsArgs, LabelArgs, RecommendArgs, SuggestArgs, SummaryArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use medfit::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "medfit",
    about = "Label healthcare companies, score career fit and serve thinking-type diagnoses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify, score and enrich a company table
    Label(LabelArgs),
    /// Propose industries for review and optionally promote them to overrides
    Suggest(SuggestArgs),
    /// Report frequent keyword tokens and candidate rules
    Keywords(KeywordsArgs),
    /// Diagnose a thinking type from 20 yes/no answers
    Diagnose(DiagnoseArgs),
    /// Print recommended companies from a scored table
    Recommend(RecommendArgs),
    /// Print label counts and relevance distribution of a company table
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured company table
    #[arg(long)]
    pub(crate) companies: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Label(args) => run_label(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Keywords(args) => run_keywords(args),
        Command::Diagnose(args) => run_diagnose(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Summary(args) => run_summary(args),
    }
}
