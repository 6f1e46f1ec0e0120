//! BoardLab CLI: daily analysis, catalog and leader commands.
//!
//! Commands:
//! - `run`: one daily analysis from a TOML config or the trailing-month defaults
//! - `boards`: list the board catalog
//! - `leaders`: leader instruments of one board
//!
//! Data comes from a CSV directory (`--data-dir`). With `--synthetic`,
//! anything the directory cannot serve falls back to deterministic synthetic
//! data and the result is tagged.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use boardlab_core::domain::BoardCategory;
use boardlab_runner::data_loader::load_market_data;
use boardlab_runner::{
    leaders_for_board, render_report, run_daily_analysis, save_artifacts, AnalysisConfig,
    AnalysisHistory, BoardDataProvider, CsvProvider, SyntheticProvider,
};

#[derive(Parser)]
#[command(name = "boardlab", about = "BoardLab CLI: board strength and rotation analysis")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DataArgs {
    /// CSV data directory.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Fall back to synthetic data when the directory cannot serve a series.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Path to a TOML analysis config.
    #[arg(long, conflicts_with = "as_of")]
    config: Option<PathBuf>,

    /// As-of date (YYYY-MM-DD) for the default trailing window. Defaults to today.
    #[arg(long)]
    as_of: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one daily analysis and save its artifacts.
    Run {
        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        data: DataArgs,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Append rows to this JSONL history file.
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// List catalog boards.
    Boards {
        /// Restrict to one category (industry or concept).
        #[arg(long)]
        category: Option<BoardCategory>,

        #[command(flatten)]
        data: DataArgs,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the leader instruments of one board.
    Leaders {
        /// Board code (e.g. BK001).
        #[arg(long)]
        board: String,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        data: DataArgs,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            window,
            data,
            output_dir,
            history,
        } => run_analysis_cmd(window, data, output_dir, history),
        Commands::Boards {
            category,
            data,
            json,
        } => run_boards_cmd(category, data, json),
        Commands::Leaders {
            board,
            window,
            data,
            json,
        } => run_leaders_cmd(&board, window, data, json),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(window: &WindowArgs) -> Result<AnalysisConfig> {
    if let Some(path) = &window.config {
        return AnalysisConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    let as_of = window
        .as_of
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--as-of must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    Ok(AnalysisConfig::daily_defaults(as_of))
}

struct Providers {
    csv: CsvProvider,
    synthetic: Option<SyntheticProvider>,
}

impl Providers {
    fn new(args: &DataArgs) -> Result<Self> {
        let csv = CsvProvider::new(&args.data_dir);
        if !csv.is_available() && !args.synthetic {
            bail!(
                "data directory '{}' not found (use --synthetic for synthetic data)",
                args.data_dir.display()
            );
        }
        Ok(Self {
            csv,
            synthetic: args.synthetic.then(SyntheticProvider::new),
        })
    }

    fn primary(&self) -> &dyn BoardDataProvider {
        &self.csv
    }

    fn fallback(&self) -> Option<&dyn BoardDataProvider> {
        self.synthetic.as_ref().map(|p| p as &dyn BoardDataProvider)
    }
}

fn run_analysis_cmd(
    window: WindowArgs,
    data: DataArgs,
    output_dir: PathBuf,
    history: Option<PathBuf>,
) -> Result<()> {
    let config = build_config(&window)?;
    let providers = Providers::new(&data)?;

    let result = run_daily_analysis(providers.primary(), providers.fallback(), &config)?;
    println!("{}", render_report(&result));

    let run_dir = save_artifacts(&result, &output_dir)?;
    info!(dir = %run_dir.display(), "artifacts saved");
    println!("Artifacts saved to: {}", run_dir.display());

    if let Some(path) = history {
        let history = AnalysisHistory::new(path);
        let rows = history
            .append_result(&result)
            .with_context(|| format!("failed to append history {}", history.path().display()))?;
        println!("History: {rows} rows appended to {}", history.path().display());
    }

    Ok(())
}

fn run_boards_cmd(category: Option<BoardCategory>, data: DataArgs, json: bool) -> Result<()> {
    let providers = Providers::new(&data)?;
    let categories: Vec<BoardCategory> = match category {
        Some(c) => vec![c],
        None => BoardCategory::all().to_vec(),
    };

    let boards = match providers.primary().list_boards(&categories) {
        Ok(boards) => boards,
        Err(e) => match providers.fallback() {
            Some(fallback) => {
                tracing::warn!(error = %e, "catalog unavailable, using synthetic catalog");
                fallback.list_boards(&categories)?
            }
            None => return Err(e.into()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&boards)?);
        return Ok(());
    }
    println!("{:<8}{:<10}Name", "Code", "Category");
    for board in &boards {
        println!("{:<8}{:<10}{}", board.code, board.category, board.name);
    }
    Ok(())
}

fn run_leaders_cmd(board: &str, window: WindowArgs, data: DataArgs, json: bool) -> Result<()> {
    let mut config = build_config(&window)?;
    // the board must be loaded to be resolved, so widen the catalog
    config.board_count = usize::MAX;
    config.validate()?;
    let providers = Providers::new(&data)?;

    let market = load_market_data(providers.primary(), providers.fallback(), &config)?;
    let leaders = leaders_for_board(&market, &config, board)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&leaders)?);
        return Ok(());
    }
    let name = market.board(board).map(|b| b.name.as_str()).unwrap_or(board);
    println!("Leaders of {board} {name} as of {}", config.end_date);
    if leaders.is_empty() {
        println!("(no leaders above {:.2} turnover share)", config.min_turnover_share);
    }
    for l in &leaders {
        println!(
            "{:<8} {:<12} pct={:+.2}% share={:.1}% return={:+.2}%{}",
            l.symbol,
            l.name,
            l.pct_change,
            l.turnover_share * 100.0,
            l.return_pct * 100.0,
            if l.is_limit_up { " LU" } else { "" }
        );
    }
    Ok(())
}
