use crate::tables;
use clap::{ArgMatches, Args};
use cutforge::config::{OptimizerConfig, Settings};
use cutforge::error::{CfResult, CutForgeError};
use cutforge::loader::load_cut_list;
use cutforge::optimizer::{OptimizationOptions, Optimizer};
use cutforge::writer;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Exit status when `--strict` is set and the plan has issues.
pub const EXIT_INFEASIBLE: i32 = 2;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Cut list CSV. Defaults to the last input used.
    pub input: Option<PathBuf>,

    /// Output directory. Defaults to `<input>_cutplan` next to the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: OptimizerConfig,

    /// Also dump the full result as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Exit with status 2 if any cut could not be planned.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Do not remember this run's input and options.
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cuts".to_string());
    input.with_file_name(format!("{}_cutplan", stem))
}

pub fn run(args: &OptimizeArgs, matches: &ArgMatches, settings_path: Option<&Path>) -> CfResult<i32> {
    let mut settings = settings_path
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let mut config = settings.optimizer.clone();
    config.merge_from_cli(&args.config, matches);

    // Kerf and flags are checked before anything is read.
    let options = OptimizationOptions::try_from(&config)?;

    let input = args
        .input
        .clone()
        .or_else(|| settings.last_input.clone())
        .ok_or_else(|| {
            CutForgeError::Config("No cut list given and none remembered from a previous run.".into())
        })?;

    let cuts = load_cut_list(&input)?;

    let started = Instant::now();
    let result = Optimizer::new(options).run(&cuts);
    info!(
        "✅ {} bars for {} pieces in {:.2?}",
        result.bar_count(),
        result.total_instances,
        started.elapsed()
    );

    tables::plan(&result);
    tables::reports(&result);

    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&input));
    writer::write_workbook(&result, &out_dir)?;

    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
        info!("💾 JSON written to {}", path.display());
    }

    println!("\nResults saved to: {}", out_dir.display());

    if !args.no_save {
        if let Some(path) = settings_path {
            settings.last_input = Some(input);
            settings.last_output = Some(out_dir);
            settings.optimizer = config;
            if let Err(e) = settings.save_to_file(path) {
                warn!("⚠️  Could not save settings to {}: {}", path.display(), e);
            }
        }
    }

    if result.is_feasible() {
        Ok(0)
    } else {
        warn!("⚠️  Plan is not final: review the issues before cutting.");
        Ok(if args.strict { EXIT_INFEASIBLE } else { 0 })
    }
}
