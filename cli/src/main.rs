//! CLI entrypoint for Travel Concierge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use concierge_application::{
    ConciergeService, EvaluationLogger, ExternalFetcher, NoEvaluationLogger, NoExternalFetcher,
    NotificationChannel, NotificationOutbox,
};
use concierge_domain::{BookingRepository, ConfigIssue, SessionId, SessionRepository};
use concierge_infrastructure::{
    CatalogData, ChannelKind, ConfigLoader, FileConfig, InMemoryBookingRepository,
    InMemoryKnowledgeStore, InMemoryOutbox, InMemorySessionRepository, JsonBookingRepository,
    JsonOutbox, JsonSessionRepository, JsonlEvaluationLogger, LogNotificationChannel,
    StorageBackend,
};
use concierge_presentation::{ChatRepl, Cli, ConsoleFormatter, OutputFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting Travel Concierge");

    let issues = config.validate();
    for issue in &issues {
        eprintln!("config {}", issue);
    }
    if ConfigIssue::has_errors(&issues) {
        return Err(anyhow!("invalid configuration"));
    }

    // === Dependency Injection ===
    let service = Arc::new(build_service(&config)?);

    let session_id = cli.session.as_deref().map(SessionId::new);
    match cli.message {
        Some(message) => {
            let reply = service.chat(&message, session_id.as_ref()).await?;
            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_reply(&reply, cli.verbose > 0),
                OutputFormat::Json => ConsoleFormatter::format_reply_json(&reply),
            };
            println!("{}", output);
            if cli.output == OutputFormat::Text && session_id.is_none() {
                println!("(session {})", reply.session_id);
            }
        }
        None => {
            let mut repl = ChatRepl::new(service)
                .with_session(session_id)
                .with_trace(cli.verbose > 0);
            repl.run().await?;
        }
    }

    Ok(())
}

/// Console logs on stderr, plus an optional non-blocking file sink.
///
/// `RUST_LOG` wins when set and no `-v` flag was given.
fn init_logging(verbose: u8, file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match file {
        Some(path) => {
            let path = Path::new(path);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let dir = dir.unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_service(config: &FileConfig) -> Result<ConciergeService> {
    let data = match &config.catalog.path {
        Some(path) => CatalogData::from_path(Path::new(path))?,
        None => CatalogData::builtin()?,
    };
    let (catalog, guides) = data.into_parts();
    let knowledge = InMemoryKnowledgeStore::from_catalog(&catalog, guides);
    info!(documents = knowledge.len(), "Knowledge store indexed");

    let (sessions, bookings, outbox): (
        Arc<dyn SessionRepository>,
        Arc<dyn BookingRepository>,
        Arc<dyn NotificationOutbox>,
    ) = match config.storage.parse_backend().0 {
        StorageBackend::Memory => (
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(InMemoryOutbox::new()),
        ),
        StorageBackend::Json => {
            let dir: PathBuf = config.storage.data_dir();
            info!(data_dir = %dir.display(), "Using JSON storage");
            (
                Arc::new(JsonSessionRepository::new(&dir)),
                Arc::new(JsonBookingRepository::new(&dir)),
                Arc::new(JsonOutbox::new(&dir)),
            )
        }
    };

    let evaluation_logger: Arc<dyn EvaluationLogger> = match &config.logging.evaluation_log {
        Some(path) => match JsonlEvaluationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoEvaluationLogger),
        },
        None => Arc::new(NoEvaluationLogger),
    };

    Ok(ConciergeService::new(
        Arc::new(catalog),
        Arc::new(knowledge),
        sessions,
        bookings,
        outbox,
    )
    .with_fetcher(build_fetcher(config))
    .with_notification_channel(build_channel(config))
    .with_evaluation_logger(evaluation_logger)
    .with_params(config.to_params()))
}

#[cfg(feature = "web-tools")]
fn build_fetcher(config: &FileConfig) -> Arc<dyn ExternalFetcher> {
    if !config.web.enabled {
        return Arc::new(NoExternalFetcher);
    }
    let timeout = Duration::from_secs(config.web.timeout_secs.max(1));
    match concierge_infrastructure::DuckDuckGoFetcher::new(&config.web.user_agent, timeout) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            warn!(error = %e, "Web lookups disabled");
            Arc::new(NoExternalFetcher)
        }
    }
}

#[cfg(not(feature = "web-tools"))]
fn build_fetcher(_config: &FileConfig) -> Arc<dyn ExternalFetcher> {
    Arc::new(NoExternalFetcher)
}

fn build_channel(config: &FileConfig) -> Arc<dyn NotificationChannel> {
    match config.notification.parse_channel().0 {
        ChannelKind::Log => Arc::new(LogNotificationChannel),
        ChannelKind::Webhook(url) => webhook_channel(url, config),
    }
}

#[cfg(feature = "web-tools")]
fn webhook_channel(url: String, config: &FileConfig) -> Arc<dyn NotificationChannel> {
    let timeout = Duration::from_secs(config.web.timeout_secs.max(1));
    match concierge_infrastructure::WebhookNotificationChannel::new(url, timeout) {
        Ok(channel) => Arc::new(channel),
        Err(e) => {
            warn!(error = %e, "Webhook unavailable, logging notifications instead");
            Arc::new(LogNotificationChannel)
        }
    }
}

#[cfg(not(feature = "web-tools"))]
fn webhook_channel(url: String, _config: &FileConfig) -> Arc<dyn NotificationChannel> {
    warn!(url = %url, "Built without web-tools, logging notifications instead");
    Arc::new(LogNotificationChannel)
}
