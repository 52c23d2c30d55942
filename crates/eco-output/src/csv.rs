//! CSV output backend.
//!
//! Creates one file in the configured output directory:
//! - `timestep_diagnostics.csv` — one row per timestep, written from the
//!   `record_diagnostics` hook so partial progress survives cancellation.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use eco_core::Timestep;
use eco_sim::{OutputDriver, TimestepDiagnostics};

use crate::row::DiagnosticsRow;
use crate::{OutputError, OutputResult};

/// Writes per-timestep diagnostics to a CSV file.
///
/// `OutputDriver` hooks have no return value, so write failures are stored
/// internally; after the run, check with [`take_error`][Self::take_error].
pub struct CsvDiagnosticsWriter {
    diagnostics: Writer<File>,
    last_error:  Option<OutputError>,
    finished:    bool,
}

impl CsvDiagnosticsWriter {
    /// Open (or create) the diagnostics file in `dir` and write the header
    /// row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut diagnostics = Writer::from_path(dir.join("timestep_diagnostics.csv"))?;
        diagnostics.write_record(["timestep", "extinctions", "productions", "combinations", "dispersals"])?;

        Ok(Self {
            diagnostics,
            last_error: None,
            finished:   false,
        })
    }

    /// Take the stored write error (if any) after the run finishes.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn write_row(&mut self, row: &DiagnosticsRow) -> OutputResult<()> {
        self.diagnostics.write_record(&[
            row.timestep.to_string(),
            row.extinctions.to_string(),
            row.productions.to_string(),
            row.combinations.to_string(),
            row.dispersals.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.diagnostics.flush()?;
        Ok(())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl OutputDriver for CsvDiagnosticsWriter {
    fn record_diagnostics(&mut self, timestep: Timestep, diag: &TimestepDiagnostics) {
        let row = DiagnosticsRow::new(timestep, diag);
        let result = self.write_row(&row);
        self.store_err(result);
    }

    fn end_run(&mut self) {
        let result = self.finish();
        self.store_err(result);
    }
}
