use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use cutforge::optimizer::PackingResult;
use cutforge::reports::summary;
use cutforge::reports::waste::format_pieces;
use cutforge::reports::{IssueRow, ProcurementRow, SummaryRow, ValidationReport, WasteRow};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn num(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn pct(ratio: f64) -> Cell {
    num(format!("{:.1}%", ratio * 100.0))
}

fn pass_fail(ok: bool) -> Cell {
    if ok {
        Cell::new("PASS").fg(Color::Green)
    } else {
        Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

/// The cut plan itself, one table per group.
pub fn plan(result: &PackingResult) {
    for group in &result.groups {
        if group.bars.is_empty() {
            continue;
        }
        println!("\n{} ({} bars)", group.key, group.bars.len());

        let mut table = new_table();
        table.set_header(header(&["Bar", "Cuts", "Used", "Leftover", "Util"]));
        for (i, bar) in group.bars.iter().enumerate() {
            let cuts: Vec<_> = bar.placements().iter().map(|p| p.length).collect();
            table.add_row(vec![
                num(i + 1),
                Cell::new(format_pieces(&cuts)),
                num(bar.used()),
                num(bar.leftover()),
                pct(bar.utilization()),
            ]);
        }
        println!("{}", table);
    }
}

pub fn reports(result: &PackingResult) {
    let r = &result.reports;
    if let Some(rows) = &r.summary {
        print_summary(rows);
    }
    if let Some(rows) = &r.procurement {
        print_procurement(rows);
    }
    if let Some(rows) = &r.waste {
        print_waste(rows);
    }
    if let Some(report) = &r.validation {
        print_validation(report);
    }
    // Issues are always shown when there are any.
    match &r.issues {
        Some(rows) => print_issues(rows),
        None if !result.issues.is_empty() => {
            print_issues(&cutforge::reports::issues::build(&result.issues))
        }
        None => {}
    }
}

pub fn print_summary(rows: &[SummaryRow]) {
    let mut table = new_table();
    table.set_header(header(&[
        "Group", "Bars", "Pieces", "Cut Length", "Kerf", "Leftover", "Util",
    ]));
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.group),
            num(row.bars_used),
            num(row.pieces),
            num(row.total_cut_length),
            num(row.kerf_used),
            num(row.leftover),
            pct(row.utilization),
        ]);
    }

    let t = summary::totals(rows);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        num(t.bars_used),
        num(t.pieces),
        num(t.total_cut_length),
        num(t.kerf_used),
        num(t.leftover),
        pct(t.utilization).fg(Color::Cyan),
    ]);
    println!("\nSummary\n{}", table);
}

pub fn print_procurement(rows: &[ProcurementRow]) {
    let mut table = new_table();
    table.set_header(header(&["Material", "Stock Length", "Bars", "Total Stock", "Leftover"]));
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.material),
            num(row.stock_length),
            num(row.bars_required).fg(Color::Cyan),
            num(row.total_stock),
            num(row.leftover),
        ]);
    }
    println!("\nProcurement\n{}", table);
}

pub fn print_waste(rows: &[WasteRow]) {
    let mut table = new_table();
    table.set_header(header(&["Group", "Bar", "Cuts", "Kerf", "Leftover", "Util"]));
    for row in rows {
        let util = if row.outlier {
            pct(row.utilization).fg(Color::Red)
        } else {
            pct(row.utilization)
        };
        table.add_row(vec![
            Cell::new(&row.group),
            num(row.bar),
            Cell::new(format_pieces(&row.pieces)),
            num(row.kerf_used),
            num(row.leftover),
            util,
        ]);
    }
    println!("\nWaste\n{}", table);
}

pub fn print_validation(report: &ValidationReport) {
    let mut table = new_table();
    table.set_header(header(&["Group", "Bars", "Overflow", "Oversize", "Unplaceable", "Result"]));
    for g in &report.groups {
        table.add_row(vec![
            Cell::new(&g.group),
            num(g.bars),
            num(g.overflowing_bars),
            num(g.oversize),
            num(g.unplaceable),
            pass_fail(g.feasible),
        ]);
    }
    table.add_row(vec![
        Cell::new("All groups").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        pass_fail(report.feasible),
    ]);
    println!("\nValidation\n{}", table);
}

pub fn print_issues(rows: &[IssueRow]) {
    if rows.is_empty() {
        println!("\nNo issues.");
        return;
    }
    let mut table = new_table();
    table.set_header(header(&[
        "Row", "Piece", "Material", "Stock", "Cut", "Largest Stock", "Problem",
    ]));
    for row in rows {
        table.add_row(vec![
            num(row.source_row),
            num(row.ordinal + 1),
            Cell::new(&row.material),
            num(row.stock_length),
            num(row.cut_length).fg(Color::Red),
            num(row.largest_stock),
            Cell::new(&row.problem),
        ]);
    }
    println!("\nIssues\n{}", table);
}
