use crate::optimizer::GroupPacking;
use crate::units::Length;
use serde::Serialize;

/// What to buy: one bar per packed bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcurementRow {
    pub material: String,
    pub stock_length: Length,
    pub bars_required: usize,
    pub total_stock: Length,
    pub leftover: Length,
}

pub fn build(groups: &[GroupPacking]) -> Vec<ProcurementRow> {
    groups
        .iter()
        .map(|g| ProcurementRow {
            material: g.key.material.clone(),
            stock_length: g.key.stock_length,
            bars_required: g.bars.len(),
            total_stock: g.key.stock_length.times(g.bars.len()),
            leftover: g.bars.iter().map(|b| b.leftover()).sum(),
        })
        .collect()
}
