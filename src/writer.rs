//! CSV output: one file per sheet of the cut plan.

use crate::error::CfResult;
use crate::loader::{COL_CUT_LENGTH, COL_MATERIAL, COL_MAX_LENGTH, COL_QUANTITY};
use crate::model::CutRequest;
use crate::optimizer::PackingResult;
use crate::reports::{issues, waste};
use crate::units::Length;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const GROUPED_CUTS_FILE: &str = "grouped_cuts.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const PROCUREMENT_FILE: &str = "procurement.csv";
pub const WASTE_FILE: &str = "waste_report.csv";
pub const VALIDATION_FILE: &str = "validation.csv";
pub const ISSUES_FILE: &str = "issues.csv";

fn percent(ratio: f64) -> f64 {
    (ratio * 10_000.0).round() / 100.0
}

fn pass_fail(ok: bool) -> &'static str {
    if ok {
        "PASS"
    } else {
        "FAIL"
    }
}

#[derive(Serialize)]
struct GroupedCutRecord<'a> {
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Material")]
    material: &'a str,
    #[serde(rename = "Stock Length")]
    stock_length: Length,
    #[serde(rename = "Bar")]
    bar: usize,
    #[serde(rename = "Pieces")]
    pieces: String,
    #[serde(rename = "Used")]
    used: Length,
    #[serde(rename = "Leftover")]
    leftover: Length,
}

#[derive(Serialize)]
struct SummaryRecord<'a> {
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Material")]
    material: &'a str,
    #[serde(rename = "Stock Length")]
    stock_length: Length,
    #[serde(rename = "Bars Used")]
    bars_used: usize,
    #[serde(rename = "Pieces")]
    pieces: usize,
    #[serde(rename = "Total Cut Length")]
    total_cut_length: Length,
    #[serde(rename = "Kerf Used")]
    kerf_used: Length,
    #[serde(rename = "Leftover")]
    leftover: Length,
    #[serde(rename = "Utilization %")]
    utilization: f64,
}

#[derive(Serialize)]
struct ProcurementRecord<'a> {
    #[serde(rename = "Material")]
    material: &'a str,
    #[serde(rename = "Stock Length")]
    stock_length: Length,
    #[serde(rename = "Bars Required")]
    bars_required: usize,
    #[serde(rename = "Total Stock")]
    total_stock: Length,
    #[serde(rename = "Leftover")]
    leftover: Length,
}

#[derive(Serialize)]
struct WasteRecord<'a> {
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Material")]
    material: &'a str,
    #[serde(rename = "Stock Length")]
    stock_length: Length,
    #[serde(rename = "Bar #")]
    bar: usize,
    #[serde(rename = "Pieces")]
    pieces: String,
    #[serde(rename = "Sum Cuts")]
    cut_length: Length,
    #[serde(rename = "Kerf Used")]
    kerf_used: Length,
    #[serde(rename = "Used Total")]
    used: Length,
    #[serde(rename = "Leftover")]
    leftover: Length,
    #[serde(rename = "Util % (bar)")]
    utilization: f64,
    #[serde(rename = "Outlier")]
    outlier: bool,
}

#[derive(Serialize)]
struct ValidationRecord<'a> {
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Bars")]
    bars: usize,
    #[serde(rename = "Overflowing Bars")]
    overflowing_bars: usize,
    #[serde(rename = "Oversize")]
    oversize: usize,
    #[serde(rename = "Unplaceable")]
    unplaceable: usize,
    #[serde(rename = "Result")]
    result: &'static str,
}

#[derive(Serialize)]
struct IssueRecord<'a> {
    #[serde(rename = "Row")]
    row: usize,
    #[serde(rename = "Piece")]
    piece: u32,
    #[serde(rename = "Material")]
    material: &'a str,
    #[serde(rename = "Stock Length")]
    stock_length: Length,
    #[serde(rename = "Cut Length")]
    cut_length: Length,
    #[serde(rename = "Largest Stock")]
    largest_stock: Length,
    #[serde(rename = "Reason")]
    reason: String,
    #[serde(rename = "Problem")]
    problem: &'a str,
}

#[derive(Serialize)]
struct CutListRecord<'a> {
    #[serde(rename = "Cut Length")]
    cut_length: Length,
    #[serde(rename = "Max Length")]
    max_length: Length,
    #[serde(rename = "Material Type")]
    material: &'a str,
    #[serde(rename = "Quantity")]
    quantity: u32,
}

fn write_records<T: Serialize>(path: &Path, records: impl IntoIterator<Item = T>) -> CfResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the grouped cuts plus every report present in `result` into
/// `dir`, creating it if needed. The issues sheet is written whenever there
/// are issues. Returns the files written, in write order.
pub fn write_workbook<P: AsRef<Path>>(result: &PackingResult, dir: P) -> CfResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join(GROUPED_CUTS_FILE);
    let mut wtr = csv::Writer::from_path(&path)?;
    for g in &result.groups {
        let label = g.key.to_string();
        for (i, bar) in g.bars.iter().enumerate() {
            let pieces: Vec<Length> = bar.placements().iter().map(|p| p.length).collect();
            wtr.serialize(GroupedCutRecord {
                group: &label,
                material: &g.key.material,
                stock_length: g.key.stock_length,
                bar: i + 1,
                pieces: waste::format_pieces(&pieces),
                used: bar.used(),
                leftover: bar.leftover(),
            })?;
        }
    }
    wtr.flush()?;
    written.push(path);

    if let Some(rows) = &result.reports.summary {
        let path = dir.join(SUMMARY_FILE);
        write_records(
            &path,
            rows.iter().map(|r| SummaryRecord {
                group: &r.group,
                material: &r.material,
                stock_length: r.stock_length,
                bars_used: r.bars_used,
                pieces: r.pieces,
                total_cut_length: r.total_cut_length,
                kerf_used: r.kerf_used,
                leftover: r.leftover,
                utilization: percent(r.utilization),
            }),
        )?;
        written.push(path);
    }

    if let Some(rows) = &result.reports.procurement {
        let path = dir.join(PROCUREMENT_FILE);
        write_records(
            &path,
            rows.iter().map(|r| ProcurementRecord {
                material: &r.material,
                stock_length: r.stock_length,
                bars_required: r.bars_required,
                total_stock: r.total_stock,
                leftover: r.leftover,
            }),
        )?;
        written.push(path);
    }

    if let Some(rows) = &result.reports.waste {
        let path = dir.join(WASTE_FILE);
        write_records(
            &path,
            rows.iter().map(|r| WasteRecord {
                group: &r.group,
                material: &r.material,
                stock_length: r.stock_length,
                bar: r.bar,
                pieces: waste::format_pieces(&r.pieces),
                cut_length: r.cut_length,
                kerf_used: r.kerf_used,
                used: r.used,
                leftover: r.leftover,
                utilization: percent(r.utilization),
                outlier: r.outlier,
            }),
        )?;
        written.push(path);
    }

    if let Some(report) = &result.reports.validation {
        let path = dir.join(VALIDATION_FILE);
        let overall = ValidationRecord {
            group: "All groups",
            bars: report.groups.iter().map(|g| g.bars).sum(),
            overflowing_bars: report.groups.iter().map(|g| g.overflowing_bars).sum(),
            oversize: report.groups.iter().map(|g| g.oversize).sum(),
            unplaceable: report.groups.iter().map(|g| g.unplaceable).sum(),
            result: pass_fail(report.feasible),
        };
        let rows = report.groups.iter().map(|g| ValidationRecord {
            group: &g.group,
            bars: g.bars,
            overflowing_bars: g.overflowing_bars,
            oversize: g.oversize,
            unplaceable: g.unplaceable,
            result: pass_fail(g.feasible),
        });
        write_records(&path, rows.chain(std::iter::once(overall)))?;
        written.push(path);
    }

    if !result.issues.is_empty() {
        let path = dir.join(ISSUES_FILE);
        let rows = issues::build(&result.issues);
        write_records(
            &path,
            rows.iter().map(|r| IssueRecord {
                row: r.source_row,
                piece: r.ordinal + 1,
                material: &r.material,
                stock_length: r.stock_length,
                cut_length: r.cut_length,
                largest_stock: r.largest_stock,
                reason: r.reason.to_string(),
                problem: &r.problem,
            }),
        )?;
        written.push(path);
    }

    info!("💾 Wrote {} file(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Writes a cut list in the format [`crate::loader::read_cut_list`] reads.
pub fn write_cut_list<P: AsRef<Path>>(path: P, cuts: &[CutRequest]) -> CfResult<()> {
    let path = path.as_ref();
    if cuts.is_empty() {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record([COL_CUT_LENGTH, COL_MAX_LENGTH, COL_MATERIAL, COL_QUANTITY])?;
        wtr.flush()?;
        return Ok(());
    }
    write_records(
        path,
        cuts.iter().map(|c| CutListRecord {
            cut_length: c.length,
            max_length: c.max_stock_length,
            material: &c.material,
            quantity: c.quantity,
        }),
    )
}
