use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use category_desk::{
    api::{CategoryApi, HttpCategoryApi},
    cli::{self, Cli},
    config::Config,
    tui,
};

/// Log to the configured file; headless commands also log to stderr
fn init_logging(config: &Config, headless: bool) -> tracing_appender::non_blocking::WorkerGuard {
    // Set default log level to INFO if not specified
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("category_desk=info"))
    };

    let directory = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let file_name = config
        .log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "category-desk.log".into());

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = headless.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(filter()),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(ref base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let _guard = init_logging(&config, cli.command.is_some());
    config.validate()?;

    let api: Arc<dyn CategoryApi> = Arc::new(
        HttpCategoryApi::new(&config.api).context("Failed to build the API client")?,
    );
    info!("Using category API at {}", config.api.base_url);

    match cli.command {
        Some(command) => {
            let mut stdout = std::io::stdout();
            let mut stderr = std::io::stderr();
            if !cli::run_and_report(command, api.as_ref(), &mut stdout, &mut stderr).await {
                // Returning lets the log guard flush before the process exits
                return Ok(ExitCode::FAILURE);
            }
        }
        None => tui::run_tui(config, api, cli.screen.into()).await?,
    }

    Ok(ExitCode::SUCCESS)
}
