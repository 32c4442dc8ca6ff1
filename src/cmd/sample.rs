use clap::Args;
use cutforge::error::CfResult;
use cutforge::sample::{generate_cut_list, DEFAULT_SEED};
use cutforge::writer::write_cut_list;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    pub output: PathBuf,

    #[arg(short = 'n', long, default_value_t = 50)]
    pub rows: usize,

    #[arg(short = 'S', long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    pub output: PathBuf,
}

pub fn run(args: &SampleArgs) -> CfResult<i32> {
    let cuts = generate_cut_list(args.rows, args.seed);
    write_cut_list(&args.output, &cuts)?;
    info!("🧪 Sample cut list ({} rows) written to {}", cuts.len(), args.output.display());
    Ok(0)
}

pub fn run_template(args: &TemplateArgs) -> CfResult<i32> {
    write_cut_list(&args.output, &[])?;
    info!("📄 Template written to {}", args.output.display());
    Ok(0)
}
