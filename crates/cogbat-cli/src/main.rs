use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cogbat_lib::{decode, load_task_data, Task5Format};
use cogbat_run::{ingest, read_config, RunConfig};
use env_logger::Env;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "cogbat",
    version,
    about = "Parse and summarize touchscreen cognitive battery logs"
)]
struct Cli {
    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Task5Layout {
    /// One summary row per block
    #[value(name = "visual-search")]
    VisualSearch,
    /// One row per go/stop trial
    #[value(name = "stopping")]
    Stopping,
}

impl From<Task5Layout> for Task5Format {
    fn from(layout: Task5Layout) -> Self {
        match layout {
            Task5Layout::VisualSearch => Task5Format::VisualSearch,
            Task5Layout::Stopping => Task5Format::Stopping,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest every new log in a folder into the store, summary and trial dumps
    Ingest {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        logs: Option<PathBuf>,
        #[arg(long)]
        summary: Option<PathBuf>,
        #[arg(long)]
        dump_dir: Option<PathBuf>,
        #[arg(long)]
        database: Option<PathBuf>,
        #[arg(long)]
        seen: Option<PathBuf>,
        #[arg(long)]
        overwrite: bool,
        #[arg(long)]
        task5_format: Option<Task5Layout>,
    },
    /// Decode a log file name into subject, device, task and timestamp
    Decode { name: String },
    /// Parse one log file and print its practice trials, task trials and summary
    Parse {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "visual-search")]
        task5_format: Task5Layout,
    },
    /// Print only the summary scalars of one log file
    Summarize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "visual-search")]
        task5_format: Task5Layout,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();
    match cli.command {
        Commands::Ingest {
            config,
            logs,
            summary,
            dump_dir,
            database,
            seen,
            overwrite,
            task5_format,
        } => {
            let mut run = match config {
                Some(path) => read_config(&path)?,
                None => RunConfig::default(),
            };
            if let Some(dir) = logs {
                run.log_dir = dir;
            }
            if let Some(path) = summary {
                run.summary_file = path;
            }
            if let Some(dir) = dump_dir {
                run.dump_dir = dir;
            }
            if let Some(path) = database {
                run.database = path;
            }
            if let Some(path) = seen {
                run.seen_files = path;
            }
            if overwrite {
                run.overwrite = true;
            }
            if let Some(layout) = task5_format {
                run.task5_format = layout.into();
            }
            cmd_ingest(&run)?
        }
        Commands::Decode { name } => cmd_decode(&name)?,
        Commands::Parse {
            input,
            task5_format,
        } => cmd_parse(&input, task5_format.into())?,
        Commands::Summarize {
            input,
            task5_format,
        } => cmd_summarize(&input, task5_format.into())?,
    }
    Ok(())
}

fn cmd_ingest(config: &RunConfig) -> Result<()> {
    info!("ingesting logs from {}", config.log_dir.display());
    let report = ingest(config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_decode(name: &str) -> Result<()> {
    let identity = decode(name)?;
    println!("{}", serde_json::to_string(&identity)?);
    Ok(())
}

fn cmd_parse(input: &Path, task5: Task5Format) -> Result<()> {
    let data = load_task_data(input, task5)
        .with_context(|| format!("parsing {}", input.display()))?;
    println!("{}", serde_json::to_string(&data)?);
    Ok(())
}

fn cmd_summarize(input: &Path, task5: Task5Format) -> Result<()> {
    let data = load_task_data(input, task5)
        .with_context(|| format!("parsing {}", input.display()))?;
    println!("{}", serde_json::to_string(&data.summary)?);
    Ok(())
}
