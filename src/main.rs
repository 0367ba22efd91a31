use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veracity_rs::classifier::LinearModel;
use veracity_rs::config::Settings;
use veracity_rs::document::{self, Document};
use veracity_rs::pipeline::{Analyzer, FixedSource, NoPrompt, SourcePrompt, TerminalPrompt};

#[derive(Parser)]
#[command(name="veracity", version, about="Classify one article as REAL, FAKE or RUMOR")]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  /// TOML file overriding thresholds, known sources and fact-check settings
  #[arg(long, global=true)] config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Cmd {
  /// End-to-end: normalize -> classify -> detect source -> decide
  Check {
    /// Article as .docx or plain text, `-` for stdin
    input: Option<PathBuf>,
    /// Exported TF-IDF + logistic regression model (JSON)
    #[arg(long, env="VERACITY_MODEL")] model: PathBuf,
    #[arg(long, env="FACTCHECK_API_KEY", hide_env_values=true)] api_key: Option<String>,
    /// Source to use when none is detected, instead of prompting
    #[arg(long, conflicts_with="no_prompt")] source: Option<String>,
    #[arg(long)] no_prompt: bool,
    /// Print the report as JSON
    #[arg(long)] json: bool,
  },
  /// Only run trusted-source detection
  Source { input: Option<PathBuf> },
}

fn read_input(input: Option<&PathBuf>) -> Result<Option<String>> {
  let doc = document::load(input.map(|p| p.as_path())).context("Failed to read document")?;
  Ok(match doc {
    Document::Text(t) => Some(t),
    Document::NoInput => { println!("No input supplied, nothing to analyse."); None }
  })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,veracity_rs=info".into()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

  match cli.cmd {
    Cmd::Check { input, model, api_key, source, no_prompt, json } => {
      let classifier = LinearModel::load(&model).context("Failed to load classifier")?;
      let Some(text) = read_input(input.as_ref())? else { return Ok(()) };

      let analyzer = Analyzer {
        classifier: Box::new(classifier),
        detector: settings.detector()?,
        engine: settings.engine(),
        checker: settings.fact_checker(api_key).context("Failed to set up fact-check client")?,
      };
      let prompt: Box<dyn SourcePrompt> = match (source, no_prompt) {
        (Some(s), _) => Box::new(FixedSource(s)),
        (None, true) => Box::new(NoPrompt),
        (None, false) => Box::new(TerminalPrompt),
      };

      let report = analyzer.analyze(&text, prompt.as_ref()).await?;
      if json { println!("{}", serde_json::to_string_pretty(&report)?); } else { println!("{report}"); }
    }
    Cmd::Source { input } => {
      let Some(text) = read_input(input.as_ref())? else { return Ok(()) };
      let m = settings.detector()?.detect(&text);
      match m.name() {
        Some(name) => println!("{name} ({})", m.tier()),
        None => println!("no trusted source detected"),
      }
    }
  }
  Ok(())
}
