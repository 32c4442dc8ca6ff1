use crate::error::{CfResult, CutForgeError};
use crate::model::CutRequest;
use crate::units::parse_length;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const COL_CUT_LENGTH: &str = "Cut Length";
pub const COL_MAX_LENGTH: &str = "Max Length";
pub const COL_MATERIAL: &str = "Material Type";
pub const COL_QUANTITY: &str = "Quantity";

const UNSPECIFIED_MATERIAL: &str = "Unspecified";

struct Columns {
    cut: usize,
    max: usize,
    material: usize,
    quantity: Option<usize>,
}

fn normalize(header: &str) -> String {
    header.trim().to_ascii_lowercase()
}

fn locate_columns(headers: &StringRecord) -> CfResult<Columns> {
    let find = |name: &str| {
        let wanted = normalize(name);
        headers.iter().position(|h| normalize(h) == wanted)
    };

    let missing: Vec<&str> = [COL_CUT_LENGTH, COL_MAX_LENGTH, COL_MATERIAL]
        .into_iter()
        .filter(|c| find(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(CutForgeError::Validation(format!(
            "The cut list must include columns {:?}. Missing: {:?}",
            [COL_CUT_LENGTH, COL_MAX_LENGTH, COL_MATERIAL],
            missing
        )));
    }

    Ok(Columns {
        cut: find(COL_CUT_LENGTH).unwrap_or_default(),
        max: find(COL_MAX_LENGTH).unwrap_or_default(),
        material: find(COL_MATERIAL).unwrap_or_default(),
        quantity: find(COL_QUANTITY),
    })
}

fn at_row(row: usize, column: &str, err: CutForgeError) -> CutForgeError {
    let msg = match err {
        CutForgeError::Parse(m) | CutForgeError::Validation(m) => m,
        other => other.to_string(),
    };
    CutForgeError::Parse(format!("Row {} ({}): {}", row, column, msg))
}

/// Reads a cut list with `Cut Length`, `Max Length`, `Material Type` and an
/// optional `Quantity` column. Row numbers follow spreadsheet numbering (the
/// header is row 1).
pub fn read_cut_list<R: Read>(reader: R) -> CfResult<Vec<CutRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let cols = locate_columns(rdr.headers()?)?;
    let mut cuts = Vec::new();
    let mut skipped = 0;

    for (idx, result) in rdr.records().enumerate() {
        let rec = result?;
        // Physical line, so blank lines the reader skips still count.
        let row = rec
            .position()
            .map_or(idx + 2, |p| usize::try_from(p.line()).unwrap_or(idx + 2));
        let field = |i: usize| rec.get(i).unwrap_or("");

        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        if field(cols.cut).is_empty() {
            warn!("⚠️  Row {}: no cut length, skipping", row);
            skipped += 1;
            continue;
        }

        let length = parse_length(field(cols.cut)).map_err(|e| at_row(row, COL_CUT_LENGTH, e))?;
        let max = parse_length(field(cols.max)).map_err(|e| at_row(row, COL_MAX_LENGTH, e))?;
        let material = match field(cols.material) {
            "" => UNSPECIFIED_MATERIAL,
            m => m,
        };
        let quantity = match cols.quantity.map(field) {
            None | Some("") => 1,
            Some(q) => q.parse::<u32>().map_err(|_| {
                CutForgeError::Parse(format!(
                    "Row {} ({}): '{}' is not a whole number",
                    row, COL_QUANTITY, q
                ))
            })?,
        };

        cuts.push(CutRequest::new(length, material, max, quantity, row)?);
    }

    if skipped > 0 {
        debug!("Skipped {} rows without a cut length", skipped);
    }
    Ok(cuts)
}

pub fn load_cut_list<P: AsRef<Path>>(path: P) -> CfResult<Vec<CutRequest>> {
    let path = path.as_ref();
    info!("📂 Reading cut list: {}", path.display());
    let file = File::open(path)?;
    let cuts = read_cut_list(file)?;
    info!("   -> {} rows", cuts.len());
    Ok(cuts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Length;

    #[test]
    fn test_reads_columns_in_any_order() {
        let data = "Material Type,Max Length,Cut Length\nPine,96,1/2\n";
        let cuts = read_cut_list(data.as_bytes()).unwrap();
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].length, Length::from_micros(500_000));
        assert_eq!(cuts[0].max_stock_length, Length::from_whole(96));
        assert_eq!(cuts[0].quantity, 1);
        assert_eq!(cuts[0].source_row, 2);
    }

    #[test]
    fn test_quantity_column() {
        let data = "cut length , max length, material type, quantity\n10,96,Oak,3\n12,96,Oak,\n";
        let cuts = read_cut_list(data.as_bytes()).unwrap();
        assert_eq!(cuts[0].quantity, 3);
        assert_eq!(cuts[1].quantity, 1);
    }

    #[test]
    fn test_missing_column() {
        let err = read_cut_list("Cut Length,Material Type\n10,Oak\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Max Length"));
    }

    #[test]
    fn test_bad_value_names_row() {
        let data = "Cut Length,Max Length,Material Type\n10,96,Oak\nabc,96,Oak\n";
        let err = read_cut_list(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Row 3"), "{}", err);
    }

    #[test]
    fn test_row_numbers_survive_blank_lines() {
        let data = "Cut Length,Max Length,Material Type\n10,96,Oak\n\n\n12,96,Oak\nabc,96,Oak\n";
        let err = read_cut_list(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Row 6"), "{}", err);

        let data = "Cut Length,Max Length,Material Type\n10,96,Oak\n\n12,96,Oak\n";
        let cuts = read_cut_list(data.as_bytes()).unwrap();
        let rows: Vec<usize> = cuts.iter().map(|c| c.source_row).collect();
        assert_eq!(rows, vec![2, 4]);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let data = "Cut Length,Max Length,Material Type\n,96,Oak\n,,\n10,96,\n";
        let cuts = read_cut_list(data.as_bytes()).unwrap();
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].material, "Unspecified");
        assert_eq!(cuts[0].source_row, 4);
    }
}
