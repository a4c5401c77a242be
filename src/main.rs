use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabletalk::config::Config;
use tabletalk::gateway::{AnalysisGateway, HttpGateway};
use tabletalk::models::{FileKind, PromptStatus, UploadedFile};
use tabletalk::session::{run_prompt, Session};
use tabletalk::tabular::{export_csv, TableData};
use tabletalk::{diagnostics, ingest};

const DEFAULT_LOG_FILTER: &str = "tabletalk=info";

#[derive(Parser)]
#[command(name = "tabletalk")]
#[command(about = "Ask natural-language questions about CSV and Excel files", long_about = None)]
struct Cli {
    /// Base URL of the analysis service (overrides ANALYSIS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides REQUEST_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal interface (default)
    Tui {
        /// Files to upload on start
        files: Vec<PathBuf>,
    },
    /// Check that the analysis service is reachable
    Probe,
    /// Print the first rows of a file
    Preview {
        path: PathBuf,
        /// Number of rows to show
        #[arg(long)]
        rows: Option<usize>,
        /// Also write the preview to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Ask one question about a file
    Ask { path: PathBuf, prompt: String },
    /// Exercise every service endpoint with sample data
    Diagnose,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?.with_overrides(cli.api_url, cli.timeout);
    let command = cli.command.unwrap_or(Commands::Tui { files: Vec::new() });

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_tracing(&config, matches!(command, Commands::Tui { .. }))?;
    info!(api_url = %config.api.base_url, "Configuration loaded");

    let gateway: Arc<dyn AnalysisGateway> = Arc::new(HttpGateway::from_config(&config.api)?);

    match command {
        Commands::Tui { files } => tabletalk::tui::run(config, gateway, files).await,
        Commands::Probe => probe(&config, gateway.as_ref()).await,
        Commands::Preview { path, rows, export } => {
            preview(&config, gateway.as_ref(), &path, rows, export).await
        }
        Commands::Ask { path, prompt } => ask(&config, gateway.as_ref(), &path, &prompt).await,
        Commands::Diagnose => diagnose(&config, gateway.as_ref()).await,
    }
}

/// Console logging for one-shot commands; a daily log file for the TUI so
/// the terminal is not overwritten.
fn init_tracing(config: &Config, to_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if to_file {
        std::fs::create_dir_all(&config.logging.log_dir)?;
        let appender = tracing_appender::rolling::daily(&config.logging.log_dir, "tabletalk.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        Ok(None)
    }
}

async fn probe(config: &Config, gateway: &dyn AnalysisGateway) -> Result<()> {
    match gateway.probe().await {
        Ok(body) => {
            println!("Backend reachable at {}", config.api.base_url);
            println!("{}", body);
            Ok(())
        }
        Err(e) => bail!("{}", e.user_message()),
    }
}

async fn load(
    config: &Config,
    gateway: &dyn AnalysisGateway,
    path: &Path,
) -> Result<(UploadedFile, TableData)> {
    let file = UploadedFile::load(path).await?;
    match ingest::load_table(&file, gateway, config.data.max_parsed_rows).await {
        Ok(table) => Ok((file, table)),
        Err(e) => bail!("{}", e.user_message()),
    }
}

async fn preview(
    config: &Config,
    gateway: &dyn AnalysisGateway,
    path: &Path,
    rows: Option<usize>,
    export: Option<PathBuf>,
) -> Result<()> {
    let (file, table) = load(config, gateway, path).await?;
    let rows = rows.unwrap_or(config.data.preview_rows);

    println!(
        "{}: {} columns, {} rows parsed",
        file.name,
        table.headers.len(),
        table.row_count()
    );
    print!("{}", format_table(&table, rows));

    if let Some(out) = export {
        let written = export_csv(&table, rows, &out)?;
        println!("Exported {} rows to {}", written, out.display());
    }
    Ok(())
}

async fn ask(
    config: &Config,
    gateway: &dyn AnalysisGateway,
    path: &Path,
    prompt: &str,
) -> Result<()> {
    let (file, table) = load(config, gateway, path).await?;
    println!("{}: {} rows parsed", file.name, table.row_count());

    if file.kind() == FileKind::Csv {
        if let Err(e) = ingest::register_with_service(&file, gateway).await {
            warn!(error = %e, "Continuing without registering the file");
        }
    }

    let mut session = Session::new(config.data.preview_rows);
    let ids = session.add_files(vec![file]);
    if let Some(id) = ids.first() {
        session.set_table(id, table);
    }

    let ticket = session.begin_prompt(prompt).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let outcome = run_prompt(gateway, &ticket.request, config.api.timeout()).await;
    session.resolve_prompt(&ticket.token, outcome);

    let Some(item) = session.history().first() else {
        bail!("prompt was not recorded");
    };
    println!("Q: {}", item.prompt);
    println!("A: {}", item.answer);
    if item.status == PromptStatus::Failed {
        bail!("analysis failed");
    }
    Ok(())
}

async fn diagnose(config: &Config, gateway: &dyn AnalysisGateway) -> Result<()> {
    let report = diagnostics::run_diagnostics(gateway, &config.api.base_url).await;

    println!("API diagnostics for {}", report.base_url);
    for check in &report.checks {
        let mark = if check.is_ok() { "ok   " } else { "FAIL " };
        println!("  {} {:<14} {}", mark, check.endpoint, check.detail);
    }

    if !report.all_ok() {
        bail!("one or more endpoints failed");
    }
    Ok(())
}

/// Fixed-width text rendering of the first `rows` rows.
fn format_table(table: &TableData, rows: usize) -> String {
    let preview = table.preview(rows);
    let widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| {
            preview
                .iter()
                .map(|row| row.get(h).to_string().chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let mut push_line = |cells: Vec<String>| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_line(table.headers.clone());
    for row in preview {
        push_line(table.headers.iter().map(|h| row.get(h).to_string()).collect());
    }
    out
}
