//! Read-only aggregations over a finished packing.
//!
//! Each builder is a pure function of the packed groups (and issues); none
//! of them touch bars or placements beyond reading them.

pub mod issues;
pub mod procurement;
pub mod summary;
pub mod validation;
pub mod waste;

pub use self::issues::IssueRow;
pub use self::procurement::ProcurementRow;
pub use self::summary::{SummaryRow, SummaryTotals};
pub use self::validation::{GroupValidation, ValidationReport};
pub use self::waste::WasteRow;

use crate::config::ReportFlags;
use crate::model::Issue;
use crate::optimizer::GroupPacking;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reports {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<SummaryRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procurement: Option<Vec<ProcurementRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste: Option<Vec<WasteRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<IssueRow>>,
}

impl Reports {
    pub fn build(
        flags: ReportFlags,
        groups: &[GroupPacking],
        issues: &[Issue],
        outlier_margin: f64,
    ) -> Self {
        Self {
            summary: flags.summary.then(|| summary::build(groups)),
            procurement: flags.procurement.then(|| procurement::build(groups)),
            validation: flags.validation.then(|| validation::build(groups)),
            waste: flags.waste.then(|| waste::build(groups, outlier_margin)),
            issues: flags.issues.then(|| issues::build(issues)),
        }
    }
}
