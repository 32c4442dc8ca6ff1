//! The cut-plan pipeline: group, filter, pack, report.

use crate::config::{OptimizerConfig, ReportFlags};
use crate::error::CutForgeError;
use crate::feasibility::{find_unplaceable, partition_oversize, split_oversize};
use crate::grouping::{group_cuts, largest_stock_by_material, total_instances};
use crate::model::{Bar, CutRequest, Group, GroupKey, InstanceId, Issue, IssueReason, Piece};
use crate::packing::{PackingStrategy, StrategyKind};
use crate::reports::validation::{self, ValidationReport};
use crate::reports::Reports;
use crate::units::{parse_kerf, Length};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOptions {
    pub kerf: Length,
    pub strategy: StrategyKind,
    pub reports: ReportFlags,
    pub allow_split_oversize: bool,
    pub parallel: bool,
    pub outlier_margin: f64,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            kerf: Length::ZERO,
            strategy: StrategyKind::FirstFit,
            reports: ReportFlags::default(),
            allow_split_oversize: false,
            parallel: true,
            outlier_margin: 0.25,
        }
    }
}

impl TryFrom<&OptimizerConfig> for OptimizationOptions {
    type Error = CutForgeError;

    fn try_from(cfg: &OptimizerConfig) -> Result<Self, Self::Error> {
        cfg.validate()?;
        Ok(Self {
            kerf: parse_kerf(&cfg.kerf)?,
            strategy: cfg.strategy,
            reports: cfg.report_flags(),
            allow_split_oversize: cfg.allow_split_oversize,
            parallel: !cfg.sequential,
            outlier_margin: cfg.outlier_margin,
        })
    }
}

/// Bars for one (material, stock length) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPacking {
    pub key: GroupKey,
    pub bars: Vec<Bar>,
    /// Instances the group received, before filtering.
    pub instances: usize,
    pub oversize: usize,
    pub unplaceable: usize,
}

impl GroupPacking {
    /// Distinct instances with at least one placement.
    pub fn placed_instances(&self) -> usize {
        self.bars
            .iter()
            .flat_map(|b| b.placements())
            .map(|p| p.instance)
            .collect::<HashSet<InstanceId>>()
            .len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackingResult {
    pub kerf: Length,
    pub strategy: StrategyKind,
    pub total_instances: usize,
    /// Ordered by material, then stock length.
    pub groups: Vec<GroupPacking>,
    /// Always populated, whatever the report flags say.
    pub issues: Vec<Issue>,
    pub reports: Reports,
}

impl PackingResult {
    pub fn validation(&self) -> ValidationReport {
        validation::build(&self.groups)
    }

    pub fn is_feasible(&self) -> bool {
        self.validation().feasible
    }

    pub fn bar_count(&self) -> usize {
        self.groups.iter().map(|g| g.bars.len()).sum()
    }

    pub fn placed_instances(&self) -> usize {
        self.groups.iter().map(|g| g.placed_instances()).sum()
    }

    pub fn group(&self, material: &str, stock_length: Length) -> Option<&GroupPacking> {
        self.groups
            .iter()
            .find(|g| g.key.material == material && g.key.stock_length == stock_length)
    }
}

pub struct Optimizer {
    options: OptimizationOptions,
    strategy: Box<dyn PackingStrategy>,
}

impl Optimizer {
    pub fn new(options: OptimizationOptions) -> Self {
        let strategy = options.strategy.strategy();
        Self { options, strategy }
    }

    /// Swaps in a custom packing strategy.
    pub fn with_strategy(options: OptimizationOptions, strategy: Box<dyn PackingStrategy>) -> Self {
        Self { options, strategy }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    pub fn run(&self, cuts: &[CutRequest]) -> PackingResult {
        let groups = group_cuts(cuts);
        let largest = largest_stock_by_material(cuts);
        let total = total_instances(cuts);

        info!(
            "📐 Packing {} pieces in {} groups (kerf {}, {})",
            total,
            groups.len(),
            self.options.kerf,
            self.strategy.kind()
        );

        // Indexed collect keeps group order regardless of completion order.
        let packed: Vec<(GroupPacking, Vec<Issue>)> = if self.options.parallel && groups.len() > 1
        {
            groups
                .par_iter()
                .map(|g| self.pack_group(g, &largest))
                .collect()
        } else {
            groups.iter().map(|g| self.pack_group(g, &largest)).collect()
        };

        let (groups, issues): (Vec<GroupPacking>, Vec<Vec<Issue>>) = packed.into_iter().unzip();
        let issues: Vec<Issue> = issues.into_iter().flatten().collect();

        if !issues.is_empty() {
            warn!("⚠️  {} cut(s) could not be planned", issues.len());
        }

        let reports = Reports::build(
            self.options.reports,
            &groups,
            &issues,
            self.options.outlier_margin,
        );

        PackingResult {
            kerf: self.options.kerf,
            strategy: self.strategy.kind(),
            total_instances: total,
            groups,
            issues,
            reports,
        }
    }

    fn pack_group(
        &self,
        group: &Group,
        largest: &BTreeMap<String, Length>,
    ) -> (GroupPacking, Vec<Issue>) {
        let stock = group.key.stock_length;
        let kerf = self.options.kerf;
        let (placeable, oversize) = partition_oversize(stock, &group.instances);

        let mut split_bars: Vec<Bar> = Vec::new();
        let mut issues: Vec<Issue> = Vec::new();
        let mut pieces: Vec<Piece> = placeable.iter().map(Piece::from).collect();

        if self.options.allow_split_oversize {
            for inst in &oversize {
                let split = split_oversize(stock, kerf, inst);
                split_bars.extend(split.full_bars);
                pieces.extend(split.remainder);
            }
            pieces.sort_by(|a, b| b.length.cmp(&a.length));
        } else {
            issues.extend(oversize.iter().map(|inst| {
                self.issue(group, inst.id, inst.source_row, inst.length, IssueReason::Oversize, largest)
            }));
        }

        let packing = self.strategy.pack(stock, kerf, &pieces);
        let failed: BTreeSet<InstanceId> = find_unplaceable(&pieces, &packing)
            .iter()
            .map(|p| p.instance)
            .collect();

        // An instance is placed whole or not at all.
        let mut bars: Vec<Bar> = split_bars
            .into_iter()
            .filter(|bar| !bar.placements().iter().any(|p| failed.contains(&p.instance)))
            .collect();
        bars.extend(packing.bars.into_iter().filter_map(|bar| {
            if bar.placements().iter().any(|p| failed.contains(&p.instance)) {
                bar.without(&failed)
            } else {
                Some(bar)
            }
        }));

        issues.extend(
            group
                .instances
                .iter()
                .filter(|inst| failed.contains(&inst.id))
                .map(|inst| {
                    self.issue(group, inst.id, inst.source_row, inst.length, IssueReason::Unplaceable, largest)
                }),
        );
        issues.sort_by_key(|i| i.instance);

        let result = GroupPacking {
            key: group.key.clone(),
            bars,
            instances: group.instances.len(),
            oversize: if self.options.allow_split_oversize {
                0
            } else {
                oversize.len()
            },
            unplaceable: failed.len(),
        };

        debug!(
            "   {}: {} pieces -> {} bars ({} oversize, {} unplaceable)",
            result.key,
            result.instances,
            result.bars.len(),
            result.oversize,
            result.unplaceable
        );

        (result, issues)
    }

    fn issue(
        &self,
        group: &Group,
        instance: InstanceId,
        source_row: usize,
        requested: Length,
        reason: IssueReason,
        largest: &BTreeMap<String, Length>,
    ) -> Issue {
        Issue {
            instance,
            source_row,
            reason,
            material: group.key.material.clone(),
            stock_length: group.key.stock_length,
            requested,
            largest_stock: largest
                .get(&group.key.material)
                .copied()
                .unwrap_or(group.key.stock_length),
        }
    }
}

/// Runs the whole pipeline once with the given options.
pub fn optimize(cuts: &[CutRequest], options: OptimizationOptions) -> PackingResult {
    Optimizer::new(options).run(cuts)
}
