use crate::optimizer::GroupPacking;
use crate::units::Length;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteRow {
    pub group: String,
    pub material: String,
    pub stock_length: Length,
    /// 1-based, in bar creation order.
    pub bar: usize,
    pub pieces: Vec<Length>,
    pub cut_length: Length,
    pub kerf_used: Length,
    pub used: Length,
    pub leftover: Length,
    /// used / stock length.
    pub utilization: f64,
    /// Utilization is more than the margin below the group average.
    pub outlier: bool,
}

pub fn build(groups: &[GroupPacking], outlier_margin: f64) -> Vec<WasteRow> {
    let mut rows = Vec::new();
    for g in groups {
        if g.bars.is_empty() {
            continue;
        }
        let average =
            g.bars.iter().map(|b| b.utilization()).sum::<f64>() / g.bars.len() as f64;
        let label = g.key.to_string();

        rows.extend(g.bars.iter().enumerate().map(|(i, bar)| {
            let utilization = bar.utilization();
            WasteRow {
                group: label.clone(),
                material: g.key.material.clone(),
                stock_length: g.key.stock_length,
                bar: i + 1,
                pieces: bar.placements().iter().map(|p| p.length).collect(),
                cut_length: bar.cut_length(),
                kerf_used: bar.kerf_used(),
                used: bar.used(),
                leftover: bar.leftover(),
                utilization,
                outlier: utilization < average - outlier_margin,
            }
        }));
    }
    rows
}

/// `[12, 12.5, 3.125]`
pub fn format_pieces(pieces: &[Length]) -> String {
    let inner: Vec<String> = pieces.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner.join(", "))
}
