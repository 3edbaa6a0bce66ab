//! CSV and JSON export of search results.

use techstack::core::Company;
use techstack::export::{ExportField, ExportFormat, render, to_csv};
use techstack::search::FilterSpec;
use techstack::test_utils::fixtures::{company, sample_catalog};

#[test]
fn csv_has_header_and_one_row_per_company() {
    let results = sample_catalog()
        .search(&FilterSpec::new().with_countries(vec!["UK".into()]))
        .unwrap();
    let csv = to_csv(&results, &[]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 1 + results.len());
    assert!(lines[0].starts_with("id,name,domain,"));
    assert!(lines[1].starts_with("3,FinSecure,finsecure.co,"));
}

#[test]
fn csv_quotes_cells_with_separators() {
    let companies = vec![
        company(1, "Acme, Inc", &["Go"]),
        Company::new(2, "Say \"hi\"", "hi.dev"),
    ];
    let csv = to_csv(&companies, &[ExportField::Id, ExportField::Name]).unwrap();
    assert_eq!(csv, "id,name\n1,\"Acme, Inc\"\n2,\"Say \"\"hi\"\"\"\n");
}

#[test]
fn list_fields_join_with_semicolons() {
    let companies = vec![company(7, "Stack", &["Rust", "Go"])];
    let csv = to_csv(&companies, &[ExportField::Technologies, ExportField::TechCount]).unwrap();
    assert_eq!(csv, "technologies,tech_count\nRust; Go,2\n");
}

#[test]
fn json_export_matches_records() {
    let results = sample_catalog().search(&FilterSpec::default()).unwrap();
    let json = render(&results, ExportFormat::Json, &[]).unwrap();
    let parsed: Vec<Company> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, results);
}
