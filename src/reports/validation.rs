use crate::optimizer::GroupPacking;
use crate::units::Length;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupValidation {
    pub group: String,
    pub material: String,
    pub stock_length: Length,
    pub bars: usize,
    /// Bars whose used length exceeds stock. Always zero unless a packing
    /// strategy is broken.
    pub overflowing_bars: usize,
    pub oversize: usize,
    pub unplaceable: usize,
    pub feasible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub groups: Vec<GroupValidation>,
    pub feasible: bool,
}

impl ValidationReport {
    pub fn infeasible_groups(&self) -> impl Iterator<Item = &GroupValidation> {
        self.groups.iter().filter(|g| !g.feasible)
    }
}

pub fn build(groups: &[GroupPacking]) -> ValidationReport {
    let groups: Vec<GroupValidation> = groups
        .iter()
        .map(|g| {
            let overflowing_bars = g.bars.iter().filter(|b| b.used() > b.stock()).count();
            GroupValidation {
                group: g.key.to_string(),
                material: g.key.material.clone(),
                stock_length: g.key.stock_length,
                bars: g.bars.len(),
                overflowing_bars,
                oversize: g.oversize,
                unplaceable: g.unplaceable,
                feasible: overflowing_bars == 0 && g.oversize == 0 && g.unplaceable == 0,
            }
        })
        .collect();

    let feasible = groups.iter().all(|g| g.feasible);
    ValidationReport { groups, feasible }
}
