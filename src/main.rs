//! Marginal command-line driver
//!
//! Replays a completion session described in JSON through an in-memory
//! host and prints the annotated candidates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use marginal::annotate::builtin::StaticLookup;
use marginal::session::{AnnotationMode, CandidateTable, CompletionSession, Minibuffer};
use marginal::{Category, Config, Registry};

/// Marginal
#[derive(Parser, Debug)]
#[command(name = "marginal")]
#[command(author = "Z1529")]
#[command(version = "0.1.0")]
#[command(about = "Category-aware annotations for completion candidates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Lookup tables for bindings, documentation, values and packages (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    lookup: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate the candidates of a session
    Annotate {
        /// Session description (JSON)
        session: PathBuf,

        /// Override the annotation column budget
        #[arg(short, long)]
        width: Option<usize>,

        /// Override the display area width
        #[arg(long)]
        frame_width: Option<usize>,

        /// Show the host's own annotations (annotation mode off)
        #[arg(long)]
        plain: bool,
    },
    /// Print the category a session resolves to
    Classify {
        /// Session description (JSON)
        session: PathBuf,
    },
    /// List the classifier chain and the annotated categories
    Categories,
    /// Print the default configuration
    Defaults,
}

/// A completion session as described on disk
#[derive(Debug, Deserialize)]
struct SessionFile {
    /// Command that opened the session
    command: Option<String>,
    prompt: String,
    /// Category declared by the host itself
    category: Option<Category>,
    table: CandidateTable,
}

impl SessionFile {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing session {}", path.display()))
    }

    fn into_session(self) -> (Option<String>, CompletionSession) {
        let mut session = CompletionSession::new(self.prompt, self.table);
        if let Some(category) = self.category {
            session = session.with_category(category);
        }
        (self.command, session)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        if is_config_error(&e) {
            eprintln!("Run `marginal defaults` to see a valid configuration.");
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    match &cli.command {
        Commands::Annotate { session, width, frame_width, plain } => {
            if let Some(width) = width {
                config.truncate_width = *width;
            }
            if let Some(frame_width) = frame_width {
                config.frame_width = *frame_width;
            }
            config.validate().context("checking --width")?;
            let registry = load_registry(cli, &config)?;
            let (command, session) = SessionFile::load(session)?.into_session();

            let mut host = Minibuffer::new(config.frame_width);
            let mut mode = AnnotationMode::new(registry);
            mode.set_enabled(&mut host, !*plain);
            host.open(command.as_deref(), session);
            for line in host.render() {
                println!("{}", line);
            }
            host.close();
            mode.disable(&mut host);
        }
        Commands::Classify { session } => {
            let registry = load_registry(cli, &config)?;
            let (command, session) = SessionFile::load(session)?.into_session();

            let mut host = Minibuffer::new(config.frame_width);
            let mut mode = AnnotationMode::new(registry);
            mode.enable(&mut host);
            host.open(command.as_deref(), session);
            match host.category() {
                Some(category) => println!("{}", category),
                None => println!("(unknown)"),
            }
        }
        Commands::Categories => {
            let registry = load_registry(cli, &config)?;
            println!("Classifiers:");
            for name in registry.chain().names() {
                println!("  {}", name);
            }
            println!("Annotated categories:");
            for category in registry.annotators().categories() {
                println!("  {}", category);
            }
        }
        Commands::Defaults => {
            println!("{}", Config::default().to_json());
        }
    }
    Ok(())
}

fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<marginal::Error>())
        .any(marginal::Error::is_config)
}

fn load_registry(cli: &Cli, config: &Config) -> Result<Registry> {
    let lookup = match &cli.lookup {
        Some(path) => StaticLookup::load(path).with_context(|| format!("loading lookup {}", path.display()))?,
        None => StaticLookup::new(),
    };
    Registry::from_config(config, Rc::new(lookup)).context("compiling configuration")
}
