//! CLI command definitions

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// Output format for the batch summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON summary
    Json,
}

/// CLI arguments for botbatch
#[derive(Parser, Debug)]
#[command(name = "botbatch")]
#[command(author, version, about = "Batch-test a Direct Line bot with a list of questions")]
#[command(long_about = r#"
botbatch sends every question from a CSV file to a Direct Line bot and
records the first bot reply to each one.

Each question gets its own conversation:
1. A conversation token is requested with the bot secret
2. A conversation is started and its activity stream opened
3. The question is posted and the stream is watched for the first reply
   until the per-question timeout

Questions run concurrently on a fixed number of workers. Unanswered
questions are reported but never stop the batch.

Configuration is loaded from (in priority order):
1. BOTBATCH_<SECTION>__<KEY>          Environment variables
2. --config <path>                    Explicit config file
3. ./botbatch.toml                    Project-level config
4. ~/.config/botbatch/config.toml     Global config

Example:
  BOTBATCH_DIRECTLINE__BOT_SECRET=... botbatch questions.csv -o results.csv
  botbatch questions.csv -c PREGUNTA -w 5 -t 60 --exchange-log run.jsonl
"#)]
pub struct Cli {
    /// CSV file with the questions (overrides batch.input)
    pub input: Option<PathBuf>,

    /// CSV file the answers are written to (overrides batch.output)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Header of the question column (overrides batch.question_column)
    #[arg(short = 'c', long, value_name = "NAME")]
    pub column: Option<String>,

    /// Number of concurrent workers (overrides dispatch.workers)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Per-question timeout in seconds (overrides dispatch.timeout_seconds)
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Write a JSONL transcript of every exchange to this file
    #[arg(long, value_name = "PATH")]
    pub exchange_log: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
