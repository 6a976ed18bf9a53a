//! Tests for constant-memory worksheets

use pretty_assertions::assert_eq;
use sheetcraft_core::{
    CellRange, Error, Format, RowOptions, Workbook, WorkbookOptions,
};

fn streaming_workbook() -> Workbook {
    let mut wb = Workbook::with_options(WorkbookOptions::new().constant_memory(true));
    wb.add_worksheet().unwrap();
    wb
}

fn sheet_data(wb: Workbook) -> String {
    let mut prepared = wb.close().unwrap();
    let mut out = Vec::new();
    prepared.write_sheet_data(0, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_earlier_row_is_rejected() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    assert!(sheet.worksheet().is_constant_memory());

    sheet.write_number(5, 0, 5.0, None).unwrap();
    match sheet.write_string(3, 0, "late", None) {
        Err(Error::OrderingViolation { row, buffered_row }) => {
            assert_eq!((row, buffered_row), (3, 5));
        }
        other => panic!("expected OrderingViolation, got {other:?}"),
    }
    // Same row, any column order
    sheet.write_number(5, 3, 6.0, None).unwrap();
    sheet.write_number(5, 1, 7.0, None).unwrap();

    assert_eq!(
        sheet_data(wb),
        r#"<row r="6"><c r="A6"><v>5</v></c><c r="B6"><v>7</v></c><c r="D6"><v>6</v></c></row>"#
    );
}

#[test]
fn test_rows_are_flushed_once_in_order() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    sheet.write_number(5, 0, 5.0, None).unwrap();
    sheet.write_number(7, 0, 7.0, None).unwrap();
    sheet.write_number(7, 0, 8.0, None).unwrap();

    let data = sheet_data(wb);
    assert_eq!(data.matches(r#"<row r="6">"#).count(), 1);
    assert_eq!(
        data,
        r#"<row r="6"><c r="A6"><v>5</v></c></row><row r="8"><c r="A8"><v>8</v></c></row>"#
    );
}

#[test]
fn test_strings_are_inline() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    sheet.write_string(0, 0, "fish & chips", None).unwrap();
    sheet.write_string(0, 1, "", None).unwrap();
    assert!(sheet.worksheet().find_cell(0, 0).is_none());

    assert!(wb.shared_strings().is_empty());
    assert_eq!(
        sheet_data(wb),
        r#"<row r="1"><c r="A1" t="inlineStr"><is><t>fish &amp; chips</t></is></c></row>"#
    );
}

#[test]
fn test_dimensions_are_tracked() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    sheet.write_number(1, 4, 1.0, None).unwrap();
    sheet.write_number(9, 2, 1.0, None).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().dimension_ref(), "C2:E10");
}

#[test]
fn test_merge_is_unsupported() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    assert!(matches!(
        sheet.merge_range(CellRange::parse("A1:B1").unwrap(), "x", None),
        Err(Error::UnsupportedInConstantMemory(_))
    ));
    assert!(wb.worksheet(0).unwrap().merged_ranges().is_empty());
}

#[test]
fn test_array_formula_writes_anchor_only() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    sheet
        .write_array_formula(CellRange::parse("A1:A2").unwrap(), "{=B1:B2*2}", None)
        .unwrap();

    assert_eq!(
        sheet_data(wb),
        r#"<row r="1"><c r="A1"><f t="array" ref="A1:A2">B1:B2*2</f><v>0</v></c></row>"#
    );
}

#[test]
fn test_row_options() {
    let mut wb = streaming_workbook();
    let fmt = wb.add_format(Format::new().bold(true));
    let mut sheet = wb.worksheet_mut(0).unwrap();

    sheet
        .set_row(0, RowOptions::new().with_height(25.0).with_format(fmt))
        .unwrap();
    sheet.write_number(0, 0, 1.0, None).unwrap();
    sheet.set_row(2, RowOptions::new().with_hidden(true)).unwrap();
    assert!(matches!(
        sheet.set_row(1, RowOptions::new()),
        Err(Error::OrderingViolation { .. })
    ));

    assert_eq!(
        sheet_data(wb),
        concat!(
            r#"<row r="1" s="1" customFormat="1" ht="25" customHeight="1"><c r="A1"><v>1</v></c></row>"#,
            r#"<row r="3" hidden="1"/>"#
        )
    );
}

#[test]
fn test_hyperlinks_survive_flush() {
    let mut wb = streaming_workbook();
    let mut sheet = wb.worksheet_mut(0).unwrap();
    sheet.write_url(0, 0, "https://example.com", None).unwrap();
    sheet.write_url(3, 1, "mailto:someone@example.com", None).unwrap();

    let prepared = wb.close().unwrap();
    let sheet = prepared.worksheet(0).unwrap();
    assert_eq!(sheet.hyperlink_count(), 2);

    let cells: Vec<_> = sheet
        .hyperlinks()
        .into_iter()
        .map(|(addr, link)| (addr.to_a1_string(), link.target.clone()))
        .collect();
    assert_eq!(
        cells,
        vec![
            ("A1".to_string(), "https://example.com".to_string()),
            ("B4".to_string(), "mailto:someone@example.com".to_string()),
        ]
    );
    assert!(prepared.shared_strings().is_empty());
}

#[test]
fn test_tmpdir_option() {
    let dir = tempfile::tempdir().unwrap();
    let mut wb = Workbook::with_options(
        WorkbookOptions::new()
            .constant_memory(true)
            .tmpdir(dir.path()),
    );
    wb.add_worksheet().unwrap();
    wb.worksheet_mut(0).unwrap().write_number(0, 0, 1.0, None).unwrap();
    assert_eq!(sheet_data(wb), r#"<row r="1"><c r="A1"><v>1</v></c></row>"#);
}

#[test]
fn test_missing_tmpdir_fails_on_sheet_creation() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let mut wb = Workbook::with_options(
        WorkbookOptions::new()
            .constant_memory(true)
            .tmpdir(missing),
    );
    assert!(matches!(wb.add_worksheet(), Err(Error::Io(_))));
    assert_eq!(wb.sheet_count(), 0);
}

#[test]
fn test_sheet_data_can_be_written_twice() {
    let mut wb = streaming_workbook();
    wb.worksheet_mut(0).unwrap().write_number(0, 0, 1.0, None).unwrap();

    let mut prepared = wb.close().unwrap();
    let mut first = Vec::new();
    let mut second = Vec::new();
    prepared.write_sheet_data(0, &mut first).unwrap();
    prepared.write_sheet_data(0, &mut second).unwrap();
    assert_eq!(first, second);
}
