/// Integration tests for sigcheck_table
///
/// These tests drive the library end to end: gathering input paths, running the
/// batch against a stand-in for sigcheck and exporting the table.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sigcheck_table::core::batch::{run_batch, BatchOptions};
use sigcheck_table::core::inspector::Inspector;
use sigcheck_table::core::table::{ResultTable, COLUMN_HEADERS};
use sigcheck_table::error::InspectError;
use sigcheck_table::utils::file_utils::{collect_input_paths, PathFilter};
use sigcheck_table::utils::output_formatter;

/// Answers with the report stored in the file itself, mimicking sigcheck's
/// output for that file
struct FileEchoInspector;

impl Inspector for FileEchoInspector {
    fn inspect(&self, path: &Path) -> Result<String, InspectError> {
        let text = fs::read_to_string(path).map_err(|source| InspectError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if text.starts_with("FAIL") {
            return Err(InspectError::ToolFailed {
                path: path.to_path_buf(),
                code: Some(1),
                stdout: String::new(),
                stderr: text,
            });
        }
        Ok(text)
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open CSV")
        .records()
        .map(|row| row.expect("Bad CSV row").iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_folder_batch_to_csv() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("sub")).unwrap();

    let fixture = include_str!("sigcheck_output.txt");
    fs::write(root.join("notepad.exe"), fixture).unwrap();
    fs::write(root.join("sub/vendor.dll"), "Verified:\tUnsigned\nCompany:\tAcme, Inc.\n").unwrap();
    fs::write(root.join("sub/broken.sys"), "FAIL: access denied").unwrap();

    let explicit = vec![root.join("missing.exe")];
    let files = collect_input_paths(&explicit, Some(root), &PathFilter::default());
    assert_eq!(files.len(), 4);

    let mut table = ResultTable::new();
    let report = run_batch(&FileEchoInspector, &files, &mut table, BatchOptions::default(), None)
        .expect("Batch failed");

    assert_eq!(report.attempted, 4);
    assert_eq!(report.recorded, 2);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0].error, InspectError::Unreadable { .. }));
    assert_eq!(report.failures[0].path, root.join("missing.exe"));

    let by_path: HashMap<_, _> = table
        .iter()
        .map(|r| (PathBuf::from(&r.file_path), r.info.clone()))
        .collect();
    let notepad = &by_path[&root.join("notepad.exe")];
    assert_eq!(notepad.verified, "Signed");
    assert_eq!(notepad.signing_date, "7:12 AM 12/7/2019");
    assert_eq!(notepad.publisher, "Microsoft Windows");
    assert_eq!(notepad.machine_type, "64-bit");
    assert_eq!(by_path[&root.join("sub/vendor.dll")].company, "Acme, Inc.");

    let csv_path = root.join("report.csv");
    output_formatter::create_csv_report(&table, &csv_path, b',').expect("Failed to write CSV");

    let rows = read_rows(&csv_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], COLUMN_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    for (row, record) in rows[1..].iter().zip(table.iter()) {
        let expected: Vec<String> = record.values().iter().map(|v| v.to_string()).collect();
        assert_eq!(row, &expected);
    }
}

#[test]
fn test_no_input_exports_header_only() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let files = collect_input_paths(&[], None, &PathFilter::default());

    let mut table = ResultTable::new();
    let report = run_batch(&FileEchoInspector, &files, &mut table, BatchOptions::default(), None)
        .expect("Batch failed");
    assert_eq!(report.attempted, 0);

    let csv_path = temp_dir.path().join("empty.csv");
    output_formatter::create_csv_report(&table, &csv_path, b',').unwrap();
    assert_eq!(read_rows(&csv_path).len(), 1);
}

#[test]
fn test_unknown_keys_do_not_leak_into_columns() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file = temp_dir.path().join("odd.exe");
    fs::write(&file, "Link date: 3:04 PM 5/6/2007\nBinary Version: 1.2.3.4\nOriginal Name: odd.exe\n").unwrap();

    let mut table = ResultTable::new();
    run_batch(&FileEchoInspector, &[file], &mut table, BatchOptions::default(), None).unwrap();

    let values = table.records()[0].values();
    assert!(values[1..].iter().all(|v| v.is_empty()));
}

/// Runs a shell script in place of sigcheck through `/bin/sh <script>`
#[cfg(unix)]
#[test]
fn test_sigcheck_inspector_process_contract() {
    use sigcheck_table::core::inspector::SigcheckInspector;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let script = temp_dir.path().join("fake_sigcheck.sh");
    fs::write(
        &script,
        r#"[ "$1" = "-nobanner" ] || { echo "missing -nobanner" >&2; exit 2; }
case "$2" in
  *bad*) echo "The system cannot find the file specified." >&2; exit 1 ;;
esac
printf '%s:\r\n' "$2"
printf '\tVerified:\tSigned\r\n'
printf '\tSigning date:\t10:15 AM 1/2/2020\r\n'
printf '\tPublisher:\tExample Corp\r\n'
"#,
    )
    .unwrap();

    let good = temp_dir.path().join("good.exe");
    let bad = temp_dir.path().join("bad.exe");
    fs::write(&good, b"MZ").unwrap();
    fs::write(&bad, b"MZ").unwrap();

    let inspector = SigcheckInspector::new("/bin/sh").with_args([script.as_os_str()]);

    let mut table = ResultTable::new();
    let report = run_batch(
        &inspector,
        &[good.clone(), bad.clone()],
        &mut table,
        BatchOptions::default(),
        None,
    )
    .unwrap();

    assert_eq!(table.len(), 1);
    let record = &table.records()[0];
    assert_eq!(record.file_path, good.to_string_lossy());
    assert_eq!(record.info.verified, "Signed");
    assert_eq!(record.info.signing_date, "10:15 AM 1/2/2020");
    assert_eq!(record.info.publisher, "Example Corp");

    assert_eq!(report.failures.len(), 1);
    match &report.failures[0].error {
        InspectError::ToolFailed { code, stderr, .. } => {
            assert_eq!(*code, Some(1));
            assert!(stderr.contains("cannot find the file"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_sigcheck_inspector_reports_missing_input() {
    use sigcheck_table::core::inspector::SigcheckInspector;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("not-here.exe");
    // The input is checked before the tool is started, so the tool path is never used
    let inspector = SigcheckInspector::new(temp_dir.path().join("sigcheck.exe"));

    let err = inspector.inspect(&missing).unwrap_err();
    match err {
        InspectError::Unreadable { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
