use crate::optimizer::GroupPacking;
use crate::units::Length;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub group: String,
    pub material: String,
    pub stock_length: Length,
    pub bars_used: usize,
    pub pieces: usize,
    pub total_cut_length: Length,
    /// kerf × (cuts − 1), summed over bars.
    pub kerf_used: Length,
    pub leftover: Length,
    /// total cut length / (bars × stock length).
    pub utilization: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub bars_used: usize,
    pub pieces: usize,
    pub stock_consumed: Length,
    pub total_cut_length: Length,
    pub kerf_used: Length,
    pub leftover: Length,
    pub utilization: f64,
}

pub fn build(groups: &[GroupPacking]) -> Vec<SummaryRow> {
    groups
        .iter()
        .map(|g| {
            let bars_used = g.bars.len();
            let total_cut_length: Length = g.bars.iter().map(|b| b.cut_length()).sum();
            let capacity = g.key.stock_length.times(bars_used);
            SummaryRow {
                group: g.key.to_string(),
                material: g.key.material.clone(),
                stock_length: g.key.stock_length,
                bars_used,
                pieces: g.bars.iter().map(|b| b.len()).sum(),
                total_cut_length,
                kerf_used: g.bars.iter().map(|b| b.kerf_used()).sum(),
                leftover: g.bars.iter().map(|b| b.leftover()).sum(),
                utilization: total_cut_length.ratio(capacity),
            }
        })
        .collect()
}

pub fn totals(rows: &[SummaryRow]) -> SummaryTotals {
    let mut t = SummaryTotals::default();
    for row in rows {
        t.bars_used += row.bars_used;
        t.pieces += row.pieces;
        t.stock_consumed += row.stock_length.times(row.bars_used);
        t.total_cut_length += row.total_cut_length;
        t.kerf_used += row.kerf_used;
        t.leftover += row.leftover;
    }
    t.utilization = t.total_cut_length.ratio(t.stock_consumed);
    t
}
