//! Canonical record serialization.

use std::fs;
use std::path::{Path, PathBuf};

use ibmetrics_core::models::schema::{CanonicalRecord, SCHEMA};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Three-row CSV: identifiers, captions, values
    Csv,
    /// JSON object keyed by field identifier
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Output file name for a period, e.g. `IBKR_DATA_OUTPUT_202508.csv`.
pub fn file_name(prefix: &str, hint: &str, format: OutputFormat) -> String {
    format!("{}{}.{}", prefix, hint, format.extension())
}

pub fn format_record(record: &CanonicalRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Json => format_json(record),
    }
}

fn format_csv(record: &CanonicalRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Identifiers
    let mut ids = vec!["Date"];
    ids.extend(SCHEMA.iter().map(|spec| spec.id));
    wtr.write_record(&ids)?;

    // Captions
    let mut captions = vec![""];
    captions.extend(SCHEMA.iter().map(|spec| spec.caption));
    wtr.write_record(&captions)?;

    // Values
    let date = record.period.to_string();
    let mut values = vec![date.as_str()];
    values.extend(record.values.iter().map(|v| v.as_deref().unwrap_or("")));
    wtr.write_record(&values)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_json(record: &CanonicalRecord) -> anyhow::Result<String> {
    let mut fields = serde_json::Map::new();
    for (id, value) in record.fields() {
        let value = match value {
            Some(v) => serde_json::Value::String(v.to_string()),
            None => serde_json::Value::Null,
        };
        fields.insert(id.to_string(), value);
    }

    let json = serde_json::json!({
        "date": record.period.to_string(),
        "fields": fields,
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Write a record into `dir`, returning the written path.
pub fn write_record(
    record: &CanonicalRecord,
    dir: &Path,
    prefix: &str,
    format: OutputFormat,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(prefix, &record.period.hint(), format));
    fs::write(&path, format_record(record, format)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibmetrics_core::TargetPeriod;
    use pretty_assertions::assert_eq;

    fn record() -> CanonicalRecord {
        let mut record = CanonicalRecord::empty(TargetPeriod::new(2025, 8).unwrap());
        record.values[0] = Some("2550.9".to_string());
        record
    }

    #[test]
    fn test_csv_has_three_rows() {
        let csv = format_record(&record(), OutputFormat::Csv).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "Date");
        assert_eq!(&rows[0][1], "USA.OBD.INTERACTIVE.ACCOUNTS.TOTAL.M");
        assert_eq!(&rows[1][0], "");
        assert!(rows[1][1].contains("\n"));
        assert_eq!(&rows[2][0], "2025-08");
        assert_eq!(&rows[2][1], "2550.9");
        assert_eq!(&rows[2][2], "");
        assert_eq!(rows[2].len(), SCHEMA.len() + 1);
    }

    #[test]
    fn test_json_nulls_for_missing() {
        let json = format_record(&record(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["date"], "2025-08");
        assert_eq!(
            value["fields"]["USA.OBD.INTERACTIVE.ACCOUNTS.TOTAL.M"],
            "2550.9"
        );
        assert!(value["fields"]["USA.OBD.INTERACTIVE.ACCOUNTLEVEL.CASH.M"].is_null());
    }

    #[test]
    fn test_write_record_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_record(&record(), dir.path(), "IBKR_DATA_OUTPUT_", OutputFormat::Csv)
            .unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("IBKR_DATA_OUTPUT_202508.csv")
        );
        assert!(path.exists());
    }
}
