//! StudyTrack CLI - study progress tracker.

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use studytrack_core::{ModuleSummary, SubjectStatus};
use studytrack_progress::ProgressStore;
use studytrack_server::ServerConfig;
use studytrack_storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Personal study progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "STUDYTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding progress_data.json and historical_data.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show progress per module
    Status,
    /// Set a subject's status
    Set {
        /// Module name
        module: String,
        /// Subject name
        subject: String,
        /// Status (not-started, in-progress, done, or any label)
        status: String,
    },
    /// Delete a subject
    Delete {
        /// Module name
        module: String,
        /// Subject name
        subject: String,
    },
    /// Delete a module and its history
    DeleteModule {
        /// Module name
        module: String,
    },
    /// Rename a module
    RenameModule {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Run the daily reset now if it is due
    Reset,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ServerConfig::load(cli.config.as_deref())?.with_env_overrides()?;
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config = config.with_port(port);
            }
            info!("Starting StudyTrack server");
            studytrack_server::run(config).await?;
        }
        Commands::Status => {
            let summary = open_store(&config).await?.summary().await;
            println!("Modules ({})", summary.len());
            for module in &summary {
                print_summary(module);
            }
        }
        Commands::Set { module, subject, status } => {
            let status = SubjectStatus::from(status);
            let store = open_store(&config).await?;
            store.update_status(&module, &subject, status.clone()).await?;
            println!("{} / {} -> {}", module, subject, status);
        }
        Commands::Delete { module, subject } => {
            open_store(&config).await?.delete_subject(&module, &subject).await?;
            println!("Deleted {} from {}", subject, module);
        }
        Commands::DeleteModule { module } => {
            let removed = open_store(&config).await?.delete_module(&module).await?;
            println!("Deleted {} ({} subjects)", module, removed.subjects.len());
        }
        Commands::RenameModule { old, new } => {
            open_store(&config).await?.rename_module(&old, &new).await?;
            println!("Renamed {} -> {}", old, new);
        }
        Commands::Reset => {
            if open_store(&config).await?.daily_reset().await? {
                println!("Daily reset applied");
            } else {
                println!("Daily reset not due");
            }
        }
    }

    Ok(())
}

async fn open_store(config: &ServerConfig) -> Result<ProgressStore<JsonFileStore>> {
    let backend = JsonFileStore::new(&config.current_file, &config.historical_file);
    ProgressStore::open(backend)
        .await
        .with_context(|| format!("failed to open {}", config.current_file.display()))
}

fn print_summary(module: &ModuleSummary) {
    println!(
        "  {} | {}/{} pts ({:.0}%) | done {} | in progress {} | not started {}",
        module.name,
        module.points,
        module.max_points,
        module.percentage(),
        module.done,
        module.in_progress,
        module.not_started,
    );
}
