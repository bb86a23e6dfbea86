//! Charter CLI - Command-line interface for constitutional content moderation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use charter_classifier::{AnthropicBackend, PromptedClassifier, UnconfiguredClassifier, FEW_SHOT_VERSION};
use charter_core::{
    AuditSink, ChainVerification, CharterConfig, CharterError, ContentSubmission, ContentType,
    Ledger, LedgerAuditSink, Moderator, PatternCatalog, RuleEngine, SemanticClassifier,
};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "charter")]
#[command(about = "Charter - Constitutional moderation for community problems, solutions and debates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the forbidden-pattern layer only
    Scan {
        #[command(flatten)]
        input: Input,
    },
    /// Run the full moderation pipeline and print the evaluation record
    Evaluate {
        /// Content type: problem, solution or debate
        #[arg(short = 't', long = "type")]
        content_type: ContentType,

        #[command(flatten)]
        input: Input,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the forbidden-pattern catalog
    Patterns,
    /// Print the classifier system prompt for a content type
    Prompt {
        /// Content type: problem, solution or debate
        #[arg(short = 't', long = "type")]
        content_type: ContentType,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Inspect the evaluation ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
}

#[derive(clap::Subcommand)]
enum LedgerAction {
    /// Verify the hash chain
    Verify {
        /// Ledger database path
        #[arg(long, default_value = "./charter_ledger.db")]
        db: PathBuf,
    },
    /// Print every entry as JSON lines
    Show {
        /// Ledger database path
        #[arg(long, default_value = "./charter_ledger.db")]
        db: PathBuf,
    },
}

#[derive(clap::Args)]
struct Input {
    /// Content to moderate
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    text: Option<String>,

    /// Read content from a file instead
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl Input {
    fn read(self) -> anyhow::Result<String> {
        match (self.text, self.file) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) => std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display())),
            (None, None) => bail!("provide content or --file"),
        }
    }
}

#[derive(Serialize)]
struct PatternRow<'a> {
    pattern: &'a str,
    description: &'a str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Scan { input }) => {
            let content = input.read()?;
            let engine = RuleEngine::new(Arc::new(PatternCatalog::standard()?));
            let result = engine.evaluate(&content);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::Evaluate {
            content_type,
            input,
            config,
        }) => {
            let content = input.read()?;
            let config = load_config(config.as_deref())?;
            evaluate(&config, ContentSubmission::new(content, content_type)).await?;
        }
        Some(Commands::Patterns) => {
            let catalog = PatternCatalog::standard()?;
            for definition in catalog.definitions() {
                let pattern = definition.pattern();
                let row = PatternRow {
                    pattern: pattern.as_str(),
                    description: pattern.description(),
                };
                println!("{}", serde_json::to_string(&row)?);
            }
        }
        Some(Commands::Prompt { content_type }) => {
            println!("# few-shot corpus {}", FEW_SHOT_VERSION);
            println!("{}", charter_classifier::system_prompt(content_type));
        }
        Some(Commands::Check { config }) => {
            let config = load_config(config.as_deref())?;
            let catalog = PatternCatalog::standard()?;
            println!("Config OK: model {}, {} patterns compiled", config.classifier.model, catalog.len());
            if config.classifier.api_key().is_err() {
                warn!(env = %config.classifier.api_key_env, "API key not set; evaluate will hold content that passes the pattern layer for review");
            }
        }
        Some(Commands::Ledger { action }) => match action {
            LedgerAction::Verify { db } => {
                let ledger = open_ledger(&db)?;
                match ledger.verify_chain()? {
                    ChainVerification::Intact { len } => println!("Ledger intact: {} entries", len),
                    ChainVerification::Broken { seq, reason } => {
                        bail!("ledger broken at entry {}: {}", seq, reason)
                    }
                }
            }
            LedgerAction::Show { db } => {
                let ledger = open_ledger(&db)?;
                for entry in ledger.entries()? {
                    println!("{}", serde_json::to_string(&entry)?);
                }
            }
        },
        None => {
            println!("Charter v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CharterConfig> {
    match path {
        Some(path) => CharterConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let config = CharterConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn open_ledger(path: &Path) -> anyhow::Result<Ledger> {
    Ledger::open(path).with_context(|| format!("failed to open ledger {}", path.display()))
}

async fn evaluate(config: &CharterConfig, submission: ContentSubmission) -> anyhow::Result<()> {
    // Without a key, pattern rejections are still decided and the rest is held for review.
    let classifier: Arc<dyn SemanticClassifier> = match config.classifier.api_key() {
        Ok(api_key) => {
            let backend = AnthropicBackend::new(
                config
                    .classifier
                    .backend_settings(api_key, config.orchestrator.layer_b_timeout()),
            )?;
            Arc::new(PromptedClassifier::new(backend, config.classifier.prompt_settings()))
        }
        Err(err) => {
            warn!(error = %err, "Layer B not configured; only pattern rejections will be decided");
            Arc::new(UnconfiguredClassifier::new(err.to_string()))
        }
    };

    let audit: Option<Arc<dyn AuditSink>> = if config.audit.enabled {
        let ledger = open_ledger(&config.audit.db_path)?;
        Some(Arc::new(LedgerAuditSink::new(ledger)))
    } else {
        None
    };

    let moderator = Moderator::from_config(config, classifier, audit)?;

    match moderator.run(submission).await {
        Ok(record) => {
            info!(record = %record.id(), decision = %record.final_decision(), "Evaluation complete");
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(CharterError::NotRecorded { record, reason }) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            bail!("evaluation record {} was not recorded: {}", record.id(), reason)
        }
        Err(err) => Err(err.into()),
    }
}
