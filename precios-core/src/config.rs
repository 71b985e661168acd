//! Resolution configuration

use crate::fetch::PayloadFormat;
use crate::normalize::NormalizeOptions;
use crate::parser::ParseOptions;
use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::Duration;

/// Everything one resolution cycle needs to know. Every value the upstream
/// layout can change (template, header offset, drop list, renames) lives
/// here, never in logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Address template with `{yyyy}`/`{mm}`/`{dd}` tokens
    pub url_template: String,
    /// Declared payload format of the fetched bytes
    pub format: PayloadFormat,
    /// Workbook sheet to read; `None` means the first sheet
    pub sheet_name: Option<String>,
    /// Preamble rows preceding the header row
    pub header_row_offset: usize,
    /// How many days before the reference date to fall back through
    pub max_lookback_days: u32,
    pub drop_empty_rows: bool,
    pub drop_empty_columns: bool,
    /// Columns stripped by name (spreadsheet-export placeholders)
    pub drop_columns: BTreeSet<String>,
    /// Positional canonical column names, applied after drops
    pub column_renames: Option<Vec<String>>,
    /// Extra request headers; the upstream rejects clients without a
    /// browser-like User-Agent
    pub request_headers: BTreeMap<String, String>,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    /// Offset applied to UTC when computing "today". The publisher works in
    /// UTC-4, so the default follows its clock rather than the server's.
    pub utc_offset_minutes: i32,
    /// Preamble row carrying the report's printed date, if any
    pub report_label_row: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            url_template: "https://agricultura.gob.do/wp-content/uploads/{yyyy}/{mm}/Informe-de-Precios-{dd}-{mm}-{yyyy}.xlsx"
                .to_string(),
            format: PayloadFormat::Workbook,
            sheet_name: None,
            header_row_offset: 5,
            max_lookback_days: 1,
            drop_empty_rows: true,
            drop_empty_columns: true,
            drop_columns: BTreeSet::from(["Unnamed: 7".to_string()]),
            column_renames: Some(
                [
                    "PRODUCTOS",
                    "UNID",
                    "MERCADOS_NUEVO",
                    "MERCADOS_CONAPROPE",
                    "MERCADOS_LOS MINA",
                    "MERCADOS_V. CONSUELO",
                    "MERCADOS_CRISTO REY",
                    "MERCADOM",
                    "SUPERMERCADO",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ),
            request_headers: BTreeMap::from([(
                "User-Agent".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                    .to_string(),
            )]),
            timeout_seconds: 15,
            cache_ttl_seconds: 600,
            utc_offset_minutes: -240,
            report_label_row: Some(2),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ReportConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Today's date in the configured time zone. The only place "now" is
    /// read; everything downstream takes the date as an argument.
    pub fn today(&self) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        Utc::now().with_timezone(&offset).date_naive()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn parse_options(&self) -> ParseOptions<'_> {
        ParseOptions {
            header_row_offset: self.header_row_offset,
            sheet_name: self.sheet_name.as_deref(),
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            drop_empty_rows: self.drop_empty_rows,
            drop_empty_columns: self.drop_empty_columns,
            drop_columns: self.drop_columns.clone(),
            column_renames: self.column_renames.clone(),
        }
    }

    /// Stable digest of the resolution-relevant fields, used with the
    /// reference date as the cache key so a config edit never serves a
    /// table shaped by the old settings.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.url_template.hash(&mut hasher);
        self.format.hash(&mut hasher);
        self.sheet_name.hash(&mut hasher);
        self.header_row_offset.hash(&mut hasher);
        self.max_lookback_days.hash(&mut hasher);
        self.drop_empty_rows.hash(&mut hasher);
        self.drop_empty_columns.hash(&mut hasher);
        self.drop_columns.hash(&mut hasher);
        self.column_renames.hash(&mut hasher);
        self.request_headers.hash(&mut hasher);
        self.report_label_row.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_deployed_dashboard() {
        let config = ReportConfig::default();
        assert_eq!(config.header_row_offset, 5);
        assert_eq!(config.max_lookback_days, 1);
        assert!(config.drop_columns.contains("Unnamed: 7"));
        assert_eq!(config.column_renames.as_ref().unwrap().len(), 9);
        assert_eq!(config.cache_ttl_seconds, 600);
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
url_template = "https://example.com/{{yyyy}}-{{mm}}-{{dd}}.csv"
format = "delimited-text"
header_row_offset = 2
max_lookback_days = 3
column_renames = ["producto", "precio"]
"#
        )
        .unwrap();

        let config = ReportConfig::from_file(file.path()).unwrap();
        assert_eq!(config.format, PayloadFormat::DelimitedText);
        assert_eq!(config.header_row_offset, 2);
        assert_eq!(config.max_lookback_days, 3);
        assert_eq!(
            config.column_renames,
            Some(vec!["producto".to_string(), "precio".to_string()])
        );
        // Untouched fields keep their defaults
        assert_eq!(config.cache_ttl_seconds, 600);
    }

    #[test]
    fn fingerprint_tracks_resolution_fields() {
        let a = ReportConfig::default();
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.header_row_offset = 4;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
