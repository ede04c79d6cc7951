//! INI file configuration adapter.

use crate::domain::error::StratlangError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StratlangError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|e| StratlangError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, StratlangError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| StratlangError::ConfigParse {
                file: "<inline>".into(),
                reason: e,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[backtest]
initial_capital = 50000.0
entry_price_column = open
exit_price_column = close
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "entry_price_column"),
            Some("open".to_string())
        );
        assert_eq!(
            adapter.get_double("backtest", "initial_capital", 0.0),
            50000.0
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_capital = 100\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string("[data]\nseed = 7\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("data", "seed", 42), 7);
        assert_eq!(adapter.get_int("data", "bad", 42), 42);
        assert_eq!(adapter.get_int("data", "missing", 42), 42);
    }

    #[test]
    fn get_double_returns_value_or_default() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\ninitial_capital = 100000.5\nbad = not_a_number\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_double("backtest", "initial_capital", 0.0),
            100000.5
        );
        assert_eq!(adapter.get_double("backtest", "bad", 99.9), 99.9);
        assert_eq!(adapter.get_double("backtest", "missing", 99.9), 99.9);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[backtest]\nexit_price_column = low\n").unwrap();

        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "exit_price_column"),
            Some("low".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, StratlangError::ConfigParse { .. }));
    }
}
