use crate::model::{Issue, IssueReason};
use crate::units::Length;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRow {
    pub source_row: usize,
    /// Which of the row's `Quantity` pieces, 0-based.
    pub ordinal: u32,
    pub material: String,
    pub stock_length: Length,
    pub cut_length: Length,
    pub largest_stock: Length,
    pub reason: IssueReason,
    pub problem: String,
}

pub fn build(issues: &[Issue]) -> Vec<IssueRow> {
    issues
        .iter()
        .map(|i| IssueRow {
            source_row: i.source_row,
            ordinal: i.instance.ordinal,
            material: i.material.clone(),
            stock_length: i.stock_length,
            cut_length: i.requested,
            largest_stock: i.largest_stock,
            reason: i.reason,
            problem: i.problem().to_string(),
        })
        .collect()
}

pub fn count(issues: &[Issue], reason: IssueReason) -> usize {
    issues.iter().filter(|i| i.reason == reason).count()
}
