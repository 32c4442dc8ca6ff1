use cutforge::config::ReportFlags;
use cutforge::loader::{load_cut_list, read_cut_list};
use cutforge::optimizer::{optimize, OptimizationOptions};
use cutforge::sample::{generate_cut_list, DEFAULT_SEED};
use cutforge::units::{parse_kerf, Length};
use cutforge::writer::{
    write_cut_list, write_workbook, GROUPED_CUTS_FILE, ISSUES_FILE, PROCUREMENT_FILE,
    SUMMARY_FILE, VALIDATION_FILE, WASTE_FILE,
};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const CUT_LIST: &str = "\
Cut Length,Max Length,Material Type,Quantity
12,25,Pine,4
30,25,Pine,1
3 1/2,96,Oak,2
1/8,96,Oak,
";

fn all_reports(kerf: &str) -> OptimizationOptions {
    OptimizationOptions {
        kerf: parse_kerf(kerf).unwrap(),
        reports: ReportFlags::all(),
        ..Default::default()
    }
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", CUT_LIST).unwrap();

    let cuts = load_cut_list(file.path()).unwrap();
    assert_eq!(cuts.len(), 4);
    assert_eq!(cuts[2].length, Length::from_micros(3_500_000));
    assert_eq!(cuts[3].quantity, 1);
    assert_eq!(cuts[3].source_row, 5);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_cut_list(dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().starts_with("IO Error"), "{}", err);
}

#[test]
fn test_workbook_writes_every_sheet() {
    let cuts = read_cut_list(CUT_LIST.as_bytes()).unwrap();
    let result = optimize(&cuts, all_reports("1"));
    let dir = tempfile::tempdir().unwrap();

    let written = write_workbook(&result, dir.path()).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            GROUPED_CUTS_FILE,
            SUMMARY_FILE,
            PROCUREMENT_FILE,
            WASTE_FILE,
            VALIDATION_FILE,
            ISSUES_FILE
        ]
    );

    let grouped = fs::read_to_string(dir.path().join(GROUPED_CUTS_FILE)).unwrap();
    let mut lines = grouped.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Group,Material,Stock Length,Bar,Pieces,Used,Leftover"
    );
    assert!(grouped.contains("25 Pine,Pine,25,1,\"[12, 12]\",25,0"), "{}", grouped);
    assert!(grouped.contains("\"[3.5, 3.5, 0.125]\""), "{}", grouped);

    let validation = fs::read_to_string(dir.path().join(VALIDATION_FILE)).unwrap();
    assert!(validation.contains("25 Pine,2,0,1,0,FAIL"), "{}", validation);
    assert!(validation.contains("96 Oak,1,0,0,0,PASS"), "{}", validation);
    assert!(validation.trim_end().ends_with("All groups,3,0,1,0,FAIL"), "{}", validation);

    let issues = fs::read_to_string(dir.path().join(ISSUES_FILE)).unwrap();
    assert!(issues.contains("3,1,Pine,25,30,25,oversize"), "{}", issues);
}

#[test]
fn test_workbook_without_reports_writes_only_cuts() {
    let cuts = read_cut_list("Cut Length,Max Length,Material Type\n10,96,Oak\n".as_bytes()).unwrap();
    let result = optimize(&cuts, OptimizationOptions::default());
    let dir = tempfile::tempdir().unwrap();

    let written = write_workbook(&result, dir.path().join("nested/out")).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with(GROUPED_CUTS_FILE));
    assert!(!dir.path().join("nested/out").join(ISSUES_FILE).exists());
}

#[test]
fn test_summary_sheet_uses_percentages() {
    let cuts = read_cut_list("Cut Length,Max Length,Material Type\n10,25,Pine\n10,25,Pine\n".as_bytes())
        .unwrap();
    let result = optimize(&cuts, all_reports("0"));
    let dir = tempfile::tempdir().unwrap();
    write_workbook(&result, dir.path()).unwrap();

    let summary = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
    assert!(summary.contains("Utilization %"));
    assert!(summary.contains("25 Pine,Pine,25,1,2,20,0,5,80"), "{}", summary);
}

#[test]
fn test_sample_list_round_trips_through_csv() {
    let cuts = generate_cut_list(30, DEFAULT_SEED);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.csv");

    write_cut_list(&path, &cuts).unwrap();
    let back = load_cut_list(&path).unwrap();
    assert_eq!(back, cuts);

    let result = optimize(&back, all_reports("1/8"));
    assert!(!result.groups.is_empty());
}

#[test]
fn test_template_has_headers_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.csv");
    write_cut_list(&path, &[]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.trim_end(), "Cut Length,Max Length,Material Type,Quantity");
    assert!(load_cut_list(&path).unwrap().is_empty());
}
