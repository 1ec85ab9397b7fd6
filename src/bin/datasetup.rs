//! datasetup CLI - fetch sample datasets once, reuse them forever
//!
//! Usage:
//!   datasetup                      Fetch the default dataset (electricity)
//!   datasetup fetch <name>...      Fetch named datasets
//!   datasetup list [--json]        List available datasets
//!   datasetup info <name>          Show dataset details and local state

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datasetup::catalog::{self, DEFAULT_DATASET};
use datasetup::core::config::{DEFAULT_DATA_DIR, DEFAULT_HTTP_TIMEOUT_SECS};
use datasetup::{AcquireError, Acquirer, ArchiveKind, Config, DatasetSpec, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "datasetup")]
#[command(about = "Download public sample datasets into a local data directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory datasets are stored in
    #[arg(short, long, global = true, env = "DATASETUP_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// HTTP timeout in seconds (clamped to 5-300)
    #[arg(short, long, global = true, env = "DATASETUP_HTTP_TIMEOUT", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one or more datasets
    Fetch {
        /// Dataset names (see `datasetup list`)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List available datasets
    List {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dataset details and whether it is present locally
    Info {
        /// Dataset name
        name: String,
    },
}

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    output::set_quiet(cli.quiet);

    let config = Config::new(&cli.data_dir)
        .with_http_timeout_secs(cli.timeout)
        .with_progress(!cli.quiet);

    match cli.command {
        None => {
            let acquirer = create_acquirer(config)?;
            let path = acquirer.electricity_consumption()?;
            println!("{}", path.display());
        }

        Some(Commands::Fetch { names }) => {
            // Resolve every name first so a typo fails before any download.
            let specs = names
                .iter()
                .map(|name| resolve_spec(name))
                .collect::<Result<Vec<_>>>()?;

            let acquirer = create_acquirer(config)?;
            let total = specs.len();
            for (i, spec) in specs.into_iter().enumerate() {
                if total > 1 {
                    output::action_numbered(i + 1, total, &format!("Fetching {}", spec.name));
                }
                let artifact = acquirer
                    .fetch(spec)
                    .with_context(|| format!("Failed to fetch dataset '{}'", spec.name))?;
                for path in artifact.paths() {
                    println!("{}", path.display());
                }
            }
        }

        Some(Commands::List { json }) => {
            if json {
                let out = serde_json::to_string_pretty(catalog::all())
                    .context("Failed to serialize catalog")?;
                println!("{}", out);
            } else {
                list_datasets(&cli.data_dir);
            }
        }

        Some(Commands::Info { name }) => {
            let spec = resolve_spec(&name)?;
            show_info(spec, &cli.data_dir);
        }
    }

    Ok(())
}

fn create_acquirer(config: Config) -> Result<Acquirer> {
    let data_dir = config.data_dir.clone();
    Acquirer::new(config)
        .with_context(|| format!("Failed to prepare data directory: {}", data_dir.display()))
}

fn resolve_spec(name: &str) -> Result<&'static DatasetSpec> {
    catalog::find(name).ok_or_else(|| AcquireError::UnknownDataset(name.to_string()).into())
}

fn list_datasets(data_dir: &Path) {
    use owo_colors::OwoColorize;

    println!("{}", "Available datasets:".bold());
    for spec in catalog::all() {
        let present = spec.is_present_in(data_dir);
        let state = if present { "[present]" } else { "" };
        output::list_item(
            &format!("{:<12}", spec.name),
            &format!("{} {}", spec.title, state),
            present,
        );
    }
}

fn show_info(spec: &DatasetSpec, data_dir: &Path) {
    use owo_colors::OwoColorize;

    println!("{} {}", spec.name.bold(), format!("- {}", spec.title).dimmed());
    println!();
    println!("{}", spec.description);
    println!();
    println!("{}", "Resources:".bold());
    for res in spec.resources {
        let dest = data_dir.join(res.file);
        let state = if dest.exists() {
            "present".green().to_string()
        } else {
            "missing".yellow().to_string()
        };
        println!("  {} [{}]", dest.display(), state);
        println!("    {}", res.url.dimmed());
    }
    match spec.extract_marker {
        Some(marker) if spec.extracts() => {
            let target = data_dir.join(marker);
            let state = if target.exists() { "extracted" } else { "not extracted" };
            println!("{} {} ({})", "Extracts to:".bold(), target.display(), state);
        }
        _ if spec.archive != ArchiveKind::None => {
            println!("{} {}", "Archive:".bold(), "left packed".dimmed());
        }
        _ => {}
    }
    if spec.name == DEFAULT_DATASET {
        println!("{}", "(fetched by default when no command is given)".dimmed());
    }
}
