use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use jellyfin_organizer::config::{ConfigBuilder, ModeOverride, OrganizerConfig, RunConfig};
use jellyfin_organizer::listing::FsLister;
use jellyfin_organizer::organizer::{Organizer, ScanMode};
use jellyfin_organizer::plan::Plan;
use jellyfin_organizer::render::{render_text, render_tree};
use jellyfin_organizer::script::{write_scripts, ScriptDialect};
use jellyfin_organizer::tui::{run_review, PlanStats, ReviewOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Guess from the folder contents
    Auto,
    /// Treat the path as a single show
    Show,
    /// Treat every subfolder as a show
    Library,
}

impl From<ModeArg> for ModeOverride {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => ModeOverride::Auto,
            ModeArg::Show => ModeOverride::Show,
            ModeArg::Library => ModeOverride::Library,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a Jellyfin/Plex friendly layout for a TV library", long_about = None)]
struct Args {
    /// Library or show folder to inspect (prompted for when omitted)
    path: Option<PathBuf>,

    /// Script flavour (defaults to the current platform)
    #[arg(short, long, value_enum)]
    dialect: Option<ScriptDialect>,

    /// Where the generated scripts are written
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// How to interpret the path
    #[arg(short, long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,

    /// JSON file overriding extensions and ignore keywords
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the full plan as JSON
    #[arg(long)]
    plan_json: Option<PathBuf>,

    /// Do not write an undo script
    #[arg(long)]
    no_undo: bool,

    /// Review the plan in an interactive screen before writing anything
    #[arg(short, long)]
    review: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(args)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("jellyfin_organizer=debug")
        } else {
            EnvFilter::new("jellyfin_organizer=info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false).without_time())
        .with(filter)
        .init();
}

fn run(args: Args) -> Result<()> {
    let target = match args.path {
        Some(path) => path,
        None => prompt_for_path()?,
    };

    let organizer_config = match &args.config {
        Some(path) => OrganizerConfig::from_json_file(path)?,
        None => OrganizerConfig::default(),
    };

    let mut builder = ConfigBuilder::new()
        .target(&target)
        .output_dir(&args.output_dir)
        .mode(args.mode.into())
        .write_undo(!args.no_undo)
        .plan_json(args.plan_json)
        .organizer(organizer_config);
    if let Some(dialect) = args.dialect {
        builder = builder.dialect(dialect);
    }
    let config = builder.build()?;

    let organizer = Organizer::new(config.organizer.clone(), FsLister)?;
    let (mode, plan) = organizer.plan(&config.target, config.mode)?;

    let name = config
        .target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| config.target.display().to_string());
    match mode {
        ScanMode::SingleShow => println!("📂 Detected SINGLE SHOW mode: {name}"),
        ScanMode::Library => {
            println!("📚 Detected LIBRARY mode (scanning subfolders of {name})...")
        }
    }

    if let Some(path) = &config.plan_json {
        write_plan_json(&plan, path)?;
    }

    let lines = render_tree(&plan);
    if lines.is_empty() {
        println!("\n✨ Library is clean! No changes needed.");
        return Ok(());
    }

    let stats = PlanStats::from_plan(&plan);
    if args.review {
        if run_review(lines, stats.clone())? == ReviewOutcome::Aborted {
            println!("Review aborted. Nothing was written.");
            return Ok(());
        }
    } else {
        let banner = "=".repeat(50);
        println!("\n{banner}");
        println!("PROPOSED CHANGES (Nothing changed yet!)");
        println!("{banner}");
        print!("{}", render_text(&lines));
        println!("{banner}");
    }

    write_apply(&plan, &config, &stats)
}

fn write_apply(plan: &Plan, config: &RunConfig, stats: &PlanStats) -> Result<()> {
    let paths = write_scripts(plan, config.dialect, &config.output_dir, config.write_undo)?;

    println!("\n{}", stats.summary());
    println!("✅ Plan generated in: {}", paths.apply.display());
    if let Some(undo) = &paths.undo {
        println!("↩️  Undo script: {}", undo.display());
    }
    println!("👉 Review the tree above. If satisfied, run the script to apply.");
    Ok(())
}

fn write_plan_json(plan: &Plan, path: &Path) -> Result<()> {
    fs::write(path, plan.to_json()?)
        .with_context(|| format!("Failed to write plan: {}", path.display()))?;
    info!(path = %path.display(), "plan written");
    Ok(())
}

fn prompt_for_path() -> Result<PathBuf> {
    print!("Enter path to Media/Show folder: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read path from stdin")?;

    let input = input.trim().trim_matches('"');
    if input.is_empty() {
        anyhow::bail!("No path given");
    }
    Ok(PathBuf::from(input))
}
