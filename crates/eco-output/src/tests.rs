//! Unit tests for the CSV diagnostics backend.

use eco_core::Timestep;
use eco_sim::{OutputDriver, TimestepDiagnostics};

use crate::CsvDiagnosticsWriter;

fn diag(extinctions: u64, productions: u64) -> TimestepDiagnostics {
    TimestepDiagnostics {
        extinctions,
        productions,
        combinations: 0,
        dispersals: 0,
    }
}

#[test]
fn writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvDiagnosticsWriter::new(dir.path()).unwrap();

    writer.record_diagnostics(Timestep(0), &diag(1, 2));
    writer.record_diagnostics(Timestep(1), &diag(3, 4));
    writer.end_run();
    assert!(writer.take_error().is_none());

    let contents = std::fs::read_to_string(dir.path().join("timestep_diagnostics.csv")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "timestep,extinctions,productions,combinations,dispersals");
    assert_eq!(lines[1], "0,1,2,0,0");
    assert_eq!(lines[2], "1,3,4,0,0");
}

#[test]
fn end_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvDiagnosticsWriter::new(dir.path()).unwrap();

    writer.record_diagnostics(Timestep(0), &diag(0, 0));
    writer.end_run();
    writer.end_run();
    assert!(writer.take_error().is_none());

    let contents = std::fs::read_to_string(dir.path().join("timestep_diagnostics.csv")).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn rows_survive_cancellation_style_early_finish() {
    // A cancelled run still records diagnostics for completed timesteps; the
    // file must hold whatever was written before end_run.
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvDiagnosticsWriter::new(dir.path()).unwrap();

    writer.record_diagnostics(Timestep(0), &diag(5, 0));
    writer.end_run();

    let contents = std::fs::read_to_string(dir.path().join("timestep_diagnostics.csv")).unwrap();
    assert!(contents.lines().any(|l| l == "0,5,0,0,0"));
}
