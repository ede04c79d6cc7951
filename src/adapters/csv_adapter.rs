//! CSV file data adapter.
//!
//! Reads and writes bar tables as `date,open,high,low,close,volume` CSV.
//! Column order in the file is free; columns are resolved by header name.
//! Input rows must already be sorted ascending by date with no duplicates;
//! the adapter validates ordering rather than re-sorting.

use crate::domain::error::StratlangError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

#[derive(Debug, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Write a bar table, header included.
    pub fn write_bars(&self, path: &Path, bars: &[OhlcvBar]) -> Result<(), StratlangError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| StratlangError::Data {
            reason: format!("failed to open {} for writing: {}", path.display(), e),
        })?;

        for bar in bars {
            writer.serialize(bar).map_err(|e| StratlangError::Data {
                reason: format!("failed to write bar row: {}", e),
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl DataPort for CsvAdapter {
    fn load_bars(&self, source: &Path) -> Result<Vec<OhlcvBar>, StratlangError> {
        let file = File::open(source)?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| StratlangError::Data {
                reason: format!("failed to read CSV header: {}", e),
            })?
            .clone();

        let mut columns = [0usize; 6];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| StratlangError::Data {
                    reason: format!("missing required column '{}'", name),
                })?;
        }
        let [date_col, open_col, high_col, low_col, close_col, volume_col] = columns;

        let mut bars: Vec<OhlcvBar> = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| StratlangError::Data {
                reason: format!("CSV parse error on row {}: {}", row + 2, e),
            })?;

            let field = |col: usize, name: &str| {
                record
                    .get(col)
                    .map(str::trim)
                    .ok_or_else(|| StratlangError::Data {
                        reason: format!("row {}: missing {} value", row + 2, name),
                    })
            };

            let date = NaiveDate::parse_from_str(field(date_col, "date")?, "%Y-%m-%d").map_err(
                |e| StratlangError::Data {
                    reason: format!("row {}: invalid date: {}", row + 2, e),
                },
            )?;

            let numeric = |col: usize, name: &str| -> Result<f64, StratlangError> {
                field(col, name)?.parse().map_err(|e| StratlangError::Data {
                    reason: format!("row {}: invalid {} value: {}", row + 2, name, e),
                })
            };

            let volume: i64 =
                field(volume_col, "volume")?
                    .parse()
                    .map_err(|e| StratlangError::Data {
                        reason: format!("row {}: invalid volume value: {}", row + 2, e),
                    })?;

            if let Some(prev) = bars.last() {
                if date <= prev.date {
                    return Err(StratlangError::Data {
                        reason: format!(
                            "row {}: dates must be strictly ascending ({} follows {})",
                            row + 2,
                            date,
                            prev.date
                        ),
                    });
                }
            }

            bars.push(OhlcvBar {
                date,
                open: numeric(open_col, "open")?,
                high: numeric(high_col, "high")?,
                low: numeric(low_col, "low")?,
                close: numeric(close_col, "close")?,
                volume,
            });
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_bars_returns_correct_data() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "bars.csv",
            "date,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n",
        );

        let bars = CsvAdapter::new().load_bars(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn load_bars_resolves_columns_by_header() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "shuffled.csv",
            "volume,close,date,open,low,high\n\
             50000,105.0,2024-01-15,100.0,90.0,110.0\n",
        );

        let bars = CsvAdapter::new().load_bars(&path).unwrap();
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn load_bars_rejects_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "partial.csv",
            "date,open,high,low,close\n2024-01-15,1,1,1,1\n",
        );

        let err = CsvAdapter::new().load_bars(&path).unwrap_err();
        assert!(matches!(err, StratlangError::Data { .. }));
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn load_bars_rejects_unsorted_dates() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "unsorted.csv",
            "date,open,high,low,close,volume\n\
             2024-01-16,1,1,1,1,1\n\
             2024-01-15,1,1,1,1,1\n",
        );

        let err = CsvAdapter::new().load_bars(&path).unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn load_bars_rejects_duplicate_dates() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "dupes.csv",
            "date,open,high,low,close,volume\n\
             2024-01-15,1,1,1,1,1\n\
             2024-01-15,1,1,1,1,1\n",
        );

        assert!(CsvAdapter::new().load_bars(&path).is_err());
    }

    #[test]
    fn load_bars_rejects_bad_date_format() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "bad_date.csv",
            "date,open,high,low,close,volume\n15/01/2024,1,1,1,1,1\n",
        );

        let err = CsvAdapter::new().load_bars(&path).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn load_bars_missing_file_is_io_error() {
        let err = CsvAdapter::new()
            .load_bars(Path::new("/nonexistent/bars.csv"))
            .unwrap_err();
        assert!(matches!(err, StratlangError::Io(_)));
    }

    #[test]
    fn write_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let bars = vec![
            OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 105.0,
                volume: 50000,
            },
            OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
                open: 105.0,
                high: 115.0,
                low: 100.0,
                close: 110.0,
                volume: 60000,
            },
        ];

        let adapter = CsvAdapter::new();
        adapter.write_bars(&path, &bars).unwrap();
        assert_eq!(adapter.load_bars(&path).unwrap(), bars);
    }

    #[test]
    fn empty_table_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "empty.csv", "date,open,high,low,close,volume\n");
        assert!(CsvAdapter::new().load_bars(&path).unwrap().is_empty());
    }
}
