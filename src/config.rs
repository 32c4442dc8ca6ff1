use crate::error::{CfResult, CutForgeError};
use crate::packing::StrategyKind;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Saw kerf, decimal (0.125) or fraction (1/8).
    #[arg(short = 'k', long, default_value = "0")]
    pub kerf: String,

    #[arg(long, default_value = "first-fit")]
    pub strategy: StrategyKind,

    #[command(flatten)]
    pub reports: ReportFlags,

    /// Enable every optional report.
    #[arg(long, default_value_t = false)]
    #[serde(skip)]
    pub all_reports: bool,

    /// Cut oversize pieces into stock-length segments instead of
    /// reporting them.
    #[arg(long, default_value_t = false)]
    pub allow_split_oversize: bool,

    /// Pack groups on the calling thread only.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Bars whose utilization falls this far below their group average are
    /// flagged in the waste report.
    #[arg(long, default_value_t = 0.25)]
    pub outlier_margin: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            kerf: "0".to_string(),
            strategy: StrategyKind::FirstFit,
            reports: ReportFlags::default(),
            all_reports: false,
            allow_split_oversize: false,
            sequential: false,
            outlier_margin: 0.25,
        }
    }
}

impl OptimizerConfig {
    pub fn report_flags(&self) -> ReportFlags {
        if self.all_reports {
            ReportFlags::all()
        } else {
            self.reports
        }
    }

    /// Overwrites fields the user typed on the command line; everything else
    /// keeps the value loaded from settings.
    pub fn merge_from_cli(&mut self, cli: &OptimizerConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($($field:ident).+, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$($field).+ = cli.$($field).+.clone();
                }
            };
        }

        update_if_present!(kerf, "kerf");
        update_if_present!(strategy, "strategy");
        update_if_present!(reports.summary, "summary");
        update_if_present!(reports.procurement, "procurement");
        update_if_present!(reports.validation, "validation");
        update_if_present!(reports.waste, "waste");
        update_if_present!(reports.issues, "issues");
        update_if_present!(all_reports, "all_reports");
        update_if_present!(allow_split_oversize, "allow_split_oversize");
        update_if_present!(sequential, "sequential");
        update_if_present!(outlier_margin, "outlier_margin");
    }

    pub fn validate(&self) -> CfResult<()> {
        if !(0.0..=1.0).contains(&self.outlier_margin) {
            return Err(CutForgeError::Config(format!(
                "--outlier-margin must be between 0 and 1, got {}",
                self.outlier_margin
            )));
        }
        Ok(())
    }
}

/// Optional reports. Packing and issue collection always run.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFlags {
    #[arg(long, default_value_t = false)]
    pub summary: bool,
    #[arg(long, default_value_t = false)]
    pub procurement: bool,
    #[arg(long, default_value_t = false)]
    pub validation: bool,
    #[arg(long, default_value_t = false)]
    pub waste: bool,
    #[arg(long, default_value_t = false)]
    pub issues: bool,
}

impl ReportFlags {
    pub fn all() -> Self {
        Self {
            summary: true,
            procurement: true,
            validation: true,
            waste: true,
            issues: true,
        }
    }

    pub fn any(&self) -> bool {
        self.summary || self.procurement || self.validation || self.waste || self.issues
    }
}

/// Remembered between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub last_input: Option<PathBuf>,
    pub last_output: Option<PathBuf>,
    pub optimizer: OptimizerConfig,
}

impl Settings {
    /// `~/.cutforge/settings.json`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".cutforge").join("settings.json"))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Missing file means first run; a broken file is logged and ignored.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings at {}", path.display());
            return Self::default();
        }
        Self::load_from_file(path).unwrap_or_else(|e| {
            warn!("⚠️  Ignoring settings at {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> CfResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
