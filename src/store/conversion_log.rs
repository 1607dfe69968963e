use crate::core::record::ConversionRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-day JSON log of conversions, one `conversions_<date>.json` file per day.
///
/// Each append reads the whole file, adds the record and rewrites the file.
#[derive(Debug, Clone)]
pub struct ConversionLog {
    dir: PathBuf,
}

impl ConversionLog {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Log kept next to the running executable.
    pub fn in_program_dir() -> Result<Self> {
        let exe = std::env::current_exe().context("Could not determine the program location")?;
        let dir = exe
            .parent()
            .with_context(|| format!("Program path has no parent: {}", exe.display()))?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("conversions_{}.json", date.format("%Y-%m-%d")))
    }

    /// Reads all records for `date`; a missing file means no records yet.
    pub fn load(&self, date: NaiveDate) -> Result<Vec<ConversionRecord>> {
        let path = self.path_for(date);
        if !path.exists() {
            debug!("No conversion log at {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read conversion log: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse conversion log: {}", path.display()))
    }

    /// Appends `record` to the file named after the record's own date.
    ///
    /// Existing entries are kept as raw JSON, so fields this crate does not
    /// know about survive the rewrite.
    pub fn append(&self, record: &ConversionRecord) -> Result<PathBuf> {
        let path = self.path_for(record.date);
        let mut entries: Vec<Value> = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read conversion log: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse conversion log: {}", path.display()))?
        } else {
            Vec::new()
        };
        entries.push(serde_json::to_value(record).context("Failed to serialize conversion")?);

        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize conversion log")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write conversion log: {}", path.display()))?;

        debug!(
            "Appended conversion to {} ({} records)",
            path.display(),
            entries.len()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::tempdir;

    fn record(amount: &str, converted: &str, date: NaiveDate) -> ConversionRecord {
        ConversionRecord::new(
            "USD".parse().unwrap(),
            "EUR".parse().unwrap(),
            Decimal::from_str(amount).unwrap(),
            Decimal::from_str(converted).unwrap(),
            date,
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_file_name_uses_date() {
        let log = ConversionLog::new("/tmp/logs");
        assert_eq!(
            log.path_for(day()),
            PathBuf::from("/tmp/logs/conversions_2024-05-01.json")
        );
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        assert!(log.load(day()).unwrap().is_empty());
    }

    #[test]
    fn test_append_to_fresh_log_round_trips() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        let record = record("100.00", "90", day());

        let path = log.append(&record).unwrap();
        assert_eq!(path, dir.path().join("conversions_2024-05-01.json"));

        let records = log.load(day()).unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn test_append_keeps_existing_records_in_order() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        let first = record("1", "0.9", day());
        let second = record("2.5", "2.25", day());

        log.append(&first).unwrap();
        log.append(&second).unwrap();

        assert_eq!(log.load(day()).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_records_for_other_days_go_to_other_files() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        let next_day = day().succ_opt().unwrap();

        log.append(&record("1", "0.9", day())).unwrap();
        log.append(&record("3", "2.7", next_day)).unwrap();

        assert_eq!(log.load(day()).unwrap().len(), 1);
        let later = log.load(next_day).unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].date, next_day);
    }

    #[test]
    fn test_file_is_pretty_printed() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        let path = log.append(&record("100.00", "90", day())).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let expected = r#"[
  {
    "base": "USD",
    "target": "EUR",
    "amount": 100,
    "convertedAmount": "90.00",
    "date": "2024-05-01"
  }
]"#;
        assert_eq!(content, expected);
    }

    #[test]
    fn test_append_keeps_unknown_fields_of_existing_entries() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        fs::write(
            log.path_for(day()),
            r#"[{"base":"USD","target":"EUR","amount":5,"convertedAmount":"4.50","date":"2024-05-01","note":"x"}]"#,
        )
        .unwrap();

        log.append(&record("1", "0.9", day())).unwrap();

        let entries: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(log.path_for(day())).unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["note"], "x");
        assert_eq!(entries[1]["convertedAmount"], "0.90");
        assert_eq!(log.load(day()).unwrap().len(), 2);
    }

    #[test]
    fn test_append_accepts_entries_of_another_shape() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        fs::write(log.path_for(day()), r#"[{"legacy":true}]"#).unwrap();

        log.append(&record("1", "0.9", day())).unwrap();

        let entries: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(log.path_for(day())).unwrap()).unwrap();
        assert_eq!(entries[0], serde_json::json!({"legacy": true}));
        assert_eq!(entries[1]["base"], "USD");
    }

    #[test]
    fn test_malformed_log_is_an_error() {
        let dir = tempdir().unwrap();
        let log = ConversionLog::new(dir.path());
        fs::write(log.path_for(day()), "{ not an array").unwrap();

        let err = log.append(&record("1", "0.9", day())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse conversion log"));
        // Original content is left untouched
        assert_eq!(
            fs::read_to_string(log.path_for(day())).unwrap(),
            "{ not an array"
        );
    }
}
