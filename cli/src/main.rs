//! CLI entrypoint for thinktank
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use thinktank_application::{
    AiService, NoEventLogger, NoProgress, Orchestrator, ProgressNotifier, RequestEventLogger,
};
use thinktank_domain::{ProjectContext, ProjectId};
use thinktank_infrastructure::{
    ConfigLoader, FileConfig, InMemoryAgentStore, InMemoryCollaborationStore,
    InMemoryThoughtStore, JsonlEventLogger, OfflineAiService, ProviderKind,
};
use thinktank_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the tracing subscriber; the guard must live until exit.
fn init_logging(verbose: u8, directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "thinktank.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    guard
}

fn build_service(config: &FileConfig, force_offline: bool) -> Result<Arc<dyn AiService>> {
    let (kind, _) = config.provider.parse_kind();
    if force_offline || kind == ProviderKind::Offline {
        info!("Using offline AI service");
        return Ok(Arc::new(OfflineAiService::new()));
    }
    build_http_service(config)
}

#[cfg(feature = "http-provider")]
fn build_http_service(config: &FileConfig) -> Result<Arc<dyn AiService>> {
    use thinktank_infrastructure::{HttpAiService, HttpProviderSettings};

    let provider = &config.provider;
    let api_key = provider.api_key();
    if api_key.is_none() {
        warn!("{} is not set; sending requests without a bearer token", provider.api_key_env);
    }
    let settings = HttpProviderSettings {
        base_url: provider.base_url.clone(),
        model: provider.model.clone(),
        api_key,
        temperature: provider.temperature,
        request_timeout: config.to_engine_config().orchestrator.ai_call_timeout,
    };
    info!("Using HTTP AI service at {} ({})", settings.base_url, settings.model);
    let service = HttpAiService::new(settings).map_err(|e| anyhow!(e))?;
    Ok(Arc::new(service))
}

#[cfg(not(feature = "http-provider"))]
fn build_http_service(_config: &FileConfig) -> Result<Arc<dyn AiService>> {
    warn!("Built without the http-provider feature; falling back to the offline AI service");
    Ok(Arc::new(OfflineAiService::new()))
}

fn open_event_log(path: Option<&Path>) -> Arc<dyn RequestEventLogger> {
    match path {
        Some(path) => match JsonlEventLogger::open(path) {
            Ok(logger) => {
                info!("Writing request events to {}", logger.path().display());
                Arc::new(logger)
            }
            Err(e) => {
                warn!("Could not open event log {}: {}", path.display(), e);
                Arc::new(NoEventLogger)
            }
        },
        None => Arc::new(NoEventLogger),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Invalid configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.directory_path().as_deref());
    info!("Starting thinktank");

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
        if issues.iter().any(|i| i.is_error()) {
            bail!("Configuration has errors");
        }
    }

    let input = cli
        .input
        .clone()
        .context("A request is required (see --help)")?;

    // === Dependency Injection ===
    let project_id = ProjectId::new(cli.project.clone());
    let agents = Arc::new(InMemoryAgentStore::with_agents(config.seed_agents(&project_id)));
    let thoughts = Arc::new(InMemoryThoughtStore::new());
    let collaborations = Arc::new(InMemoryCollaborationStore::new());
    let service = build_service(&config, cli.offline)?;
    let event_log = cli.event_log.clone().or_else(|| config.logging.event_log_path());

    let orchestrator = Orchestrator::new(
        service,
        agents,
        thoughts,
        collaborations,
        config.to_engine_config(),
    )
    .with_event_logger(open_event_log(event_log.as_deref()));

    let context = cli
        .context
        .iter()
        .fold(ProjectContext::new(), |ctx, item| ctx.with_working(item.as_str(), 1.0));

    // Ctrl-C cancels the request cooperatively
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl+C, cancelling...");
            signal_token.cancel();
        }
    });

    let progress: Box<dyn ProgressNotifier> = if cli.quiet || cli.output == OutputFormat::Json {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let result = orchestrator
        .process_user_input_with(&project_id, &input, &context, progress.as_ref(), Some(token))
        .await;
    drop(progress);

    let response = match result {
        Ok(response) => response,
        Err(e) if e.is_cancelled() => bail!("Request cancelled"),
        Err(e) => return Err(anyhow!(e)),
    };

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&input, &response),
        OutputFormat::Response => ConsoleFormatter::format_response_only(&response),
        OutputFormat::Json => ConsoleFormatter::format_json(&response),
    };
    println!("{}", output);

    Ok(())
}
