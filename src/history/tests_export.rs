#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::export::*;
use super::tests::make_record;
use super::*;
use chrono::{FixedOffset, TimeZone as _};
use tempfile::TempDir;

const HEADER: &str = "Job Title,Company,Platform,Application Type,Status,Date,Notes";

fn export_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap()
}

fn export(records: &[ApplicationRecord]) -> Option<CsvExport> {
    to_csv_at(records, &ExportOptions::utc(), export_time())
}

#[test]
fn empty_input_exports_nothing() {
    assert_eq!(export(&[]), None);
    assert_eq!(to_csv(&[], &ExportOptions::default()), None);
}

#[test]
fn header_then_one_line_per_record() {
    let records = vec![
        make_record("Engineer", "Acme", Some("linkedin"), true),
        make_record("Analyst", "Globex", None, false),
        make_record("Designer", "Initech", Some("indeed"), true),
    ];
    let csv = export(&records).expect("csv");
    let lines: Vec<&str> = csv.content.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len(), records.len() + 1);
    assert!(!csv.content.ends_with('\n'));
}

#[test]
fn row_fields_follow_header_order() {
    let record = ApplicationRecord {
        application_type: Some("easy_apply".to_owned()),
        timestamp: Some("2024-05-01T09:30:00.000Z".to_owned()),
        message: Some("Submitted via Easy Apply".to_owned()),
        ..make_record("Engineer", "Acme", Some("linkedin"), true)
    };
    let csv = export(&[record]).expect("csv");
    assert_eq!(
        csv.content.lines().nth(1),
        Some(
            "\"Engineer\",\"Acme\",\"linkedin\",\"easy_apply\",\"Successful\",\
             \"5/1/2024, 9:30:00 AM\",\"Submitted via Easy Apply\""
        )
    );
}

#[test]
fn missing_fields_use_defaults() {
    let record = ApplicationRecord {
        error: Some("Form rejected".to_owned()),
        ..ApplicationRecord::default()
    };
    let csv = export(&[record]).expect("csv");
    assert_eq!(
        csv.content.lines().nth(1),
        Some("\"\",\"\",\"External\",\"Unknown\",\"Failed\",\"\",\"Form rejected\"")
    );
}

#[test]
fn quotes_are_doubled_and_commas_kept() {
    let record = make_record("Engineer", "Acme, \"Inc\"", None, true);
    let csv = export(&[record]).expect("csv");
    let row = csv.content.lines().nth(1).expect("row");
    assert!(row.contains("\"Acme, \"\"Inc\"\"\""), "row: {row}");
}

#[test]
fn unparseable_timestamp_is_written_verbatim() {
    let record = ApplicationRecord {
        timestamp: Some("last tuesday".to_owned()),
        ..make_record("Engineer", "Acme", None, true)
    };
    let csv = export(&[record]).expect("csv");
    assert!(csv.content.contains("\"last tuesday\""));
}

#[test]
fn date_rendered_in_configured_offset_and_format() {
    let record = ApplicationRecord {
        timestamp: Some("2024-05-01T23:30:00.000Z".to_owned()),
        ..make_record("Engineer", "Acme", None, true)
    };
    let options = ExportOptions::utc()
        .with_date_format("%Y-%m-%d %H:%M")
        .expect("valid format")
        .with_offset(FixedOffset::east_opt(2 * 3600).expect("offset"));
    let csv = to_csv_at(&[record], &options, export_time()).expect("csv");
    assert!(csv.content.contains("\"2024-05-02 01:30\""), "{}", csv.content);
}

#[test]
fn invalid_date_format_is_rejected() {
    assert!(ExportOptions::utc().with_date_format("%Q%").is_err());
    assert_eq!(
        ExportOptions::utc().date_format(),
        DEFAULT_DATE_FORMAT
    );
}

#[test]
fn filename_embeds_export_date_and_media_type_is_csv() {
    let csv = export(&[make_record("Engineer", "Acme", None, true)]).expect("csv");
    assert_eq!(csv.filename, "application_history_2024-05-02.csv");
    assert_eq!(csv.media_type, "text/csv;charset=utf-8");
}

#[test]
fn rows_keep_input_order() {
    let records = vec![
        make_record("first", "A", None, true),
        make_record("second", "B", None, true),
    ];
    let csv = export(&records).expect("csv");
    let lines: Vec<&str> = csv.content.lines().collect();
    assert!(lines[1].starts_with("\"first\""));
    assert!(lines[2].starts_with("\"second\""));
}

#[test]
fn write_to_dir_creates_file() {
    let dir = TempDir::new().expect("tempdir");
    let csv = export(&[make_record("Engineer", "Acme", None, true)]).expect("csv");
    let path = csv.write_to_dir(&dir.path().join("exports")).expect("write");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("application_history_2024-05-02.csv")
    );
    let written = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(written, csv.content);
}
