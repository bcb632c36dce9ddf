use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use rotation_core::config::RotationConfig;
use rotation_core::core::types::PoolOrderKind;
use rotation_core::report::{export_history_report, export_pair_matrix, pair_count_lines};
use rotation_core::roster::load_roster;
use rotation_core::{GroupAssigner, Run};
use std::io::{stdout, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Roster,
    Sorted,
    Shuffled,
}

impl From<OrderArg> for PoolOrderKind {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Roster => PoolOrderKind::Roster,
            OrderArg::Sorted => PoolOrderKind::Sorted,
            OrderArg::Shuffled => PoolOrderKind::Shuffled,
        }
    }
}

/// Forms this week's groups so people keep meeting new partners.
#[derive(Debug, Parser)]
#[command(name = "group_rotation", version)]
struct Cli {
    /// TOML config file (defaults to $GROUP_ROTATION_CONFIG or the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Roster file, one participant per line
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Group history file (.json, or .bin for the binary format)
    #[arg(long)]
    state: Option<PathBuf>,
    #[arg(short = 'k', long)]
    group_size: Option<usize>,
    /// How the roster is ordered before groups are drawn
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Seed for the shuffled order
    #[arg(long)]
    seed: Option<u64>,
    /// Where to write the pair count matrix CSV
    #[arg(long)]
    matrix: Option<PathBuf>,
    /// Where to write the week-by-week report
    #[arg(long)]
    report: Option<PathBuf>,
    /// Show the next groups without saving anything
    #[arg(long)]
    dry_run: bool,
    /// Skip the matrix and report files
    #[arg(long)]
    no_export: bool,
    /// Print how often each pair has worked together
    #[arg(long)]
    show_pairs: bool,
}

impl Cli {
    fn apply(&self, config: &mut RotationConfig) {
        if let Some(path) = &self.roster {
            config.files.roster = path.clone();
        }
        if let Some(path) = &self.state {
            config.files.state = path.clone();
        }
        if let Some(path) = &self.matrix {
            config.files.matrix = path.clone();
        }
        if let Some(path) = &self.report {
            config.files.report = path.clone();
        }
        if let Some(size) = self.group_size {
            config.grouping.group_size = size;
        }
        if let Some(order) = self.order {
            config.grouping.pool_order = order.into();
        }
        if let Some(seed) = self.seed {
            config.grouping.seed = seed;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = RotationConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    info!(
        roster = %config.files.roster.display(),
        state = %config.files.state.display(),
        group_size = config.grouping.group_size,
        pool_order = ?config.grouping.pool_order(),
        dry_run = cli.dry_run,
        "loaded group rotation config"
    );

    let roster = load_roster(&config.files.roster)?;
    let mut assigner = GroupAssigner::open(roster, &config.files.state)
        .with_context(|| format!("could not open group history {}", config.files.state.display()))?
        .with_pool_order(config.grouping.pool_order());

    let week = assigner.runs().len() + 1;
    let run = if cli.dry_run {
        assigner.preview(config.grouping.group_size)?
    } else {
        assigner.form_groups(config.grouping.group_size)?
    };
    print_run(week, &run, cli.dry_run)?;

    if cli.show_pairs {
        for line in pair_count_lines(assigner.all_pair_counts()) {
            println!("{}", line);
        }
    }

    if !cli.dry_run && !cli.no_export {
        export_pair_matrix(&config.files.matrix, assigner.roster(), assigner.all_pair_counts())?;
        export_history_report(&config.files.report, assigner.runs())?;
    }
    Ok(())
}

fn print_run(week: usize, run: &Run, dry_run: bool) -> Result<()> {
    let mut out = stdout();
    let title = if dry_run {
        format!("Week {} (preview, not saved)", week)
    } else {
        format!("Week {}", week)
    };
    writeln!(out, "{}", title.bold())?;
    for (i, group) in run.iter().enumerate() {
        writeln!(out, "  {} {}", format!("Group {}:", i + 1).cyan(), group.join(", "))?;
    }
    out.flush()?;
    Ok(())
}
