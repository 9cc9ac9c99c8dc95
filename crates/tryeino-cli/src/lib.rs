//! Command-line front end for the question-answering API

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tryeino_client::{ChatAnswer, ClientConfig, DocumentUploaded, RequestClient};

/// Default API location when no config file or flag says otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Parser, Debug)]
#[command(name = "tryeino")]
#[command(about = "Upload documents and ask questions against a tryEino server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML file with base_url, timeout_ms and headers
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds, overrides the config file
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Upload a document for indexing
    Upload(UploadArgs),

    /// Ask a question about the uploaded documents
    Ask {
        /// Question text
        #[arg(value_name = "QUESTION")]
        question: String,
    },

    /// Check whether the server answers
    Ping,
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Document title
    #[arg(short, long)]
    pub title: String,

    /// Document text
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub content: Option<String>,

    /// Read the document text from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl UploadArgs {
    fn read_content(&self) -> Result<String> {
        match (&self.content, &self.file) {
            (Some(content), _) => Ok(content.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading document {}", path.display())),
            (None, None) => anyhow::bail!("either --content or --file is required"),
        }
    }
}

/// Initialize logging for the CLI
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the client config from file, then apply command-line overrides
pub fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => ClientConfig::new().with_base_url(DEFAULT_BASE_URL),
    };

    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ClientConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Run a parsed command and return the process exit code
pub async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;
    debug!("Using API at {}", config.base_url);
    let client = RequestClient::new(config).context("building HTTP client")?;

    match cli.command {
        Commands::Upload(args) => {
            let content = args.read_content()?;
            let reply = client.upload_document(&args.title, &content).await?;
            if let Ok(uploaded) = serde_json::from_value::<DocumentUploaded>(reply.clone()) {
                info!("Uploaded '{}' as {} chunks", uploaded.title, uploaded.chunks);
            }
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(0)
        }
        Commands::Ask { question } => {
            let reply = client.ask_question(&question).await?;
            match serde_json::from_value::<ChatAnswer>(reply.clone()) {
                Ok(answer) => println!("{}", answer.answer),
                Err(_) => println!("{}", serde_json::to_string_pretty(&reply)?),
            }
            Ok(0)
        }
        Commands::Ping => {
            if client.check_connection().await {
                println!("connected");
                Ok(0)
            } else {
                println!("unreachable");
                Ok(1)
            }
        }
    }
}
