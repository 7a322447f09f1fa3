//! The simulation log: one [`DailyRecord`] per simulated day, and a CSV writer for it.

use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::error::EpiError;

/// Aggregate statistics for one simulated day.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DailyRecord {
    /// 1-based day number.
    pub day: u32,
    pub new_infections: u64,
    pub tests_administered: u64,
    pub positive_tests: u64,
    /// `positive_tests / (tests_administered + ε)`, so zero on days without tests.
    pub positive_rate: f64,
    pub cumulative_infections: u64,
    pub cumulative_tests: u64,
    pub seed: u64,
}

/// Append-only, day-ordered sequence of [`DailyRecord`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationLog {
    records: Vec<DailyRecord>,
}

impl SimulationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: DailyRecord) -> &DailyRecord {
        debug_assert!(
            self.records.last().is_none_or(|last| last.day < record.day),
            "daily records must be appended in day order"
        );
        let index = self.records.len();
        self.records.push(record);
        &self.records[index]
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    /// Total new infections over all logged days.
    #[must_use]
    pub fn total_infections(&self) -> u64 {
        self.records.iter().map(|record| record.new_infections).sum()
    }

    /// Writes the log to a new CSV file at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an [`EpiError`] if the path is not a `.csv` file or cannot be written.
    pub fn write_csv(&self, path: &Path) -> Result<(), EpiError> {
        let mut writer = ReportWriter::create(path)?;
        writer.write_log(self)?;
        writer.flush()
    }
}

impl<'a> IntoIterator for &'a SimulationLog {
    type Item = &'a DailyRecord;
    type IntoIter = std::slice::Iter<'a, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful.
fn generate_validate_filepath(path: &Path) -> Result<File, EpiError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(EpiError::ReportError(format!(
            "report output files must be CSVs, got {}",
            path.display()
        ))),
    }
}

/// Writes records from one or more runs into a single CSV file with one header row.
pub struct ReportWriter {
    writer: Writer<File>,
}

impl ReportWriter {
    /// # Errors
    ///
    /// Returns an [`EpiError`] if the path is not a `.csv` file or cannot be created.
    pub fn create(path: &Path) -> Result<Self, EpiError> {
        let file = generate_validate_filepath(path)?;
        Ok(Self {
            writer: Writer::from_writer(file),
        })
    }

    /// # Errors
    ///
    /// Returns an [`EpiError`] if a record cannot be serialized or written.
    pub fn write_record(&mut self, record: &DailyRecord) -> Result<(), EpiError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an [`EpiError`] if a record cannot be serialized or written.
    pub fn write_log(&mut self, log: &SimulationLog) -> Result<(), EpiError> {
        for record in log {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an [`EpiError`] if the underlying file cannot be flushed.
    pub fn flush(&mut self) -> Result<(), EpiError> {
        self.writer.flush()?;
        Ok(())
    }
}
