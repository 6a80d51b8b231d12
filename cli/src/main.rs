//! CLI entrypoint for botbatch
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use botbatch_application::{
    AnswerListener, BatchProgressNotifier, DispatchQuestionsUseCase, ExchangeLogger,
    ExchangeQuestionUseCase, NoExchangeLogger, NoProgress, RunBatchInput, RunBatchUseCase,
};
use botbatch_infrastructure::{
    ConfigLoader, CsvQuestionSource, CsvResultSink, DirectLineClient, DirectLineGateway,
    FileConfig, JsonlExchangeLogger,
};
use botbatch_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    apply_overrides(&cli, &mut config);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", toml::to_string_pretty(&redacted(&config))?);
        return Ok(());
    }

    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());
    info!("Starting botbatch");

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {}", issue);
        }
        bail!("Invalid configuration ({} issues)", issues.len());
    }

    // === Dependency Injection ===
    let profile = config
        .routing_profile()
        .map_err(|issues| anyhow!("Cannot resolve channel data: {:?}", issues))?;
    let client = DirectLineClient::new(
        config.endpoints(),
        config.directline.bot_secret.clone(),
        profile,
        config.directline.request_timeout(),
    )
    .context("Failed to build HTTP client")?;
    let gateway = Arc::new(DirectLineGateway::new(client));

    let logger: Arc<dyn ExchangeLogger> = match &config.logging.exchange_log {
        Some(path) => match JsonlExchangeLogger::open(path) {
            Some(logger) => {
                info!("Exchange transcript: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoExchangeLogger),
        },
        None => Arc::new(NoExchangeLogger),
    };

    let progress: Arc<dyn BatchProgressNotifier> = if cli.quiet {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let params = config.dispatch.to_params();
    let exchange = ExchangeQuestionUseCase::new(gateway, AnswerListener::from_params(&params))
        .with_logger(logger);
    let dispatcher = DispatchQuestionsUseCase::new(exchange, params).with_progress(progress);
    let use_case = RunBatchUseCase::new(
        Arc::new(CsvQuestionSource::new()),
        Arc::new(CsvResultSink::new()),
        dispatcher,
    );

    let input = RunBatchInput::new(
        config.batch.input.clone(),
        config.batch.question_column.clone(),
        config.batch.output.clone(),
    );
    let report = use_case.execute(input).await?;

    // Output results
    let output = match cli.format {
        OutputFormat::Text => ConsoleFormatter::format(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` wins over `-v` when set. With a log directory, events are
/// also written to a daily rolling file; the returned guard must live until
/// exit so buffered lines are flushed.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "botbatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_ansi(false).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

/// CLI flags are the highest-priority configuration layer.
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(input) = &cli.input {
        config.batch.input = input.clone();
    }
    if let Some(output) = &cli.output {
        config.batch.output = output.clone();
    }
    if let Some(column) = &cli.column {
        config.batch.question_column = column.clone();
    }
    if let Some(workers) = cli.workers {
        config.dispatch.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.dispatch.timeout_seconds = timeout;
    }
    if let Some(path) = &cli.exchange_log {
        config.logging.exchange_log = Some(path.clone());
    }
}

fn redacted(config: &FileConfig) -> FileConfig {
    let mut shown = config.clone();
    if !shown.directline.bot_secret.is_empty() {
        shown.directline.bot_secret = "********".to_string();
    }
    shown
}
