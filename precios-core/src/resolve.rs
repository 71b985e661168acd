//! Fallback resolution across candidate dates

use crate::config::ReportConfig;
use crate::error::{FetchError, ResolveError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::table::Table;
use crate::{calendar, locator, normalize, parser};
use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, info, warn};

/// Why one candidate was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NotFound,
    Transport,
    Parse,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "not found"),
            FailureReason::Transport => write!(f, "transport error"),
            FailureReason::Parse => write!(f, "parse error"),
        }
    }
}

/// One discarded candidate, kept for the exhaustion report
#[derive(Debug, Clone)]
pub struct Attempt {
    pub date: NaiveDate,
    pub address: String,
    pub reason: FailureReason,
    pub detail: String,
}

/// A successful resolution cycle: the normalized table plus provenance
#[derive(Debug, Clone)]
pub struct Resolution {
    pub table: Table,
    /// The address that actually served the report
    pub address: String,
    /// The candidate date that succeeded
    pub date: NaiveDate,
    /// The report's printed date line, recovered from the preamble
    pub report_label: Option<String>,
}

/// Walks candidate dates most-recent-first, running locate → fetch → parse
/// → normalize for each until one fully succeeds. Stateless: two calls with
/// the same reference date and upstream content give the same result.
pub struct Resolver<F: Fetcher> {
    config: ReportConfig,
    fetcher: F,
}

impl Resolver<HttpFetcher> {
    /// Resolver backed by a blocking HTTP client built from the config
    pub fn from_config(config: ReportConfig) -> anyhow::Result<Self> {
        let headers = config
            .request_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let fetcher = HttpFetcher::new(config.timeout(), headers, config.format)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> Resolver<F> {
    pub fn with_fetcher(config: ReportConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run one resolution cycle for the given reference date.
    ///
    /// `NotFound`, transport and parse failures advance to the next
    /// candidate; a candidate either yields a complete usable table or is
    /// discarded entirely. Only exhaustion of the whole window or a schema
    /// mismatch (a config defect, not a transient condition) reach the
    /// caller.
    pub fn resolve(&self, reference: NaiveDate) -> Result<Resolution, ResolveError> {
        let mut attempts = Vec::new();

        for date in calendar::candidates(reference, self.config.max_lookback_days) {
            let address = locator::resolve_url(&self.config.url_template, date);
            debug!(%date, %address, "trying candidate");

            let payload = match self.fetcher.fetch(&address) {
                Ok(payload) => payload,
                Err(err) => {
                    let reason = match err {
                        FetchError::NotFound(_) => FailureReason::NotFound,
                        FetchError::Transport { .. } => FailureReason::Transport,
                    };
                    debug!(%date, %reason, "candidate fetch failed");
                    attempts.push(Attempt {
                        date,
                        address,
                        reason,
                        detail: err.to_string(),
                    });
                    continue;
                }
            };

            let parsed = match parser::parse(&payload, &self.config.parse_options()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    debug!(%date, error = %err, "candidate parse failed");
                    attempts.push(Attempt {
                        date,
                        address,
                        reason: FailureReason::Parse,
                        detail: err.to_string(),
                    });
                    continue;
                }
            };

            let report_label = self
                .config
                .report_label_row
                .and_then(|row| parsed.preamble.get(row))
                .and_then(|cells| cells.iter().find(|c| !c.is_blank()))
                .map(|c| c.display_text());

            let mut table = parsed.table;
            normalize::normalize(&mut table, &self.config.normalize_options())?;

            info!(
                %date,
                %address,
                rows = table.row_count(),
                columns = table.column_count(),
                "report resolved"
            );
            return Ok(Resolution {
                table,
                address,
                date,
                report_label,
            });
        }

        warn!(
            %reference,
            lookback = self.config.max_lookback_days,
            "all candidate dates failed"
        );
        Err(ResolveError::Exhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{PayloadFormat, RawPayload};
    use std::collections::HashMap;

    /// In-memory fetcher: maps addresses to canned payloads or failures
    struct FakeFetcher {
        responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, address: &str) -> Result<RawPayload, FetchError> {
            match self.responses.get(address) {
                Some(Ok(bytes)) => Ok(RawPayload {
                    bytes: bytes.clone(),
                    format: PayloadFormat::DelimitedText,
                }),
                Some(Err(FetchError::NotFound(a))) => Err(FetchError::NotFound(a.clone())),
                Some(Err(FetchError::Transport { address, message })) => {
                    Err(FetchError::Transport {
                        address: address.clone(),
                        message: message.clone(),
                    })
                }
                None => Err(FetchError::NotFound(address.to_string())),
            }
        }
    }

    fn test_config() -> ReportConfig {
        ReportConfig {
            url_template: "https://reports.test/{yyyy}-{mm}-{dd}.csv".to_string(),
            format: PayloadFormat::DelimitedText,
            header_row_offset: 2,
            max_lookback_days: 1,
            drop_columns: Default::default(),
            column_renames: None,
            report_label_row: Some(1),
            ..ReportConfig::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const REPORT: &str = "MINISTERIO,,\n\
                          Reporte del 03-12-2025,,\n\
                          PRODUCTOS,UNID,PRECIO\n\
                          Yuca fresca,lb,25.50\n\
                          Arroz,lb,30\n\
                          Pollo,lb,75\n";

    #[test]
    fn falls_back_to_previous_day_on_not_found() {
        let today = "https://reports.test/2025-12-04.csv".to_string();
        let yesterday = "https://reports.test/2025-12-03.csv".to_string();
        let fetcher = FakeFetcher {
            responses: HashMap::from([
                (today.clone(), Err(FetchError::NotFound(today))),
                (yesterday.clone(), Ok(REPORT.as_bytes().to_vec())),
            ]),
        };

        let resolver = Resolver::with_fetcher(test_config(), fetcher);
        let resolution = resolver.resolve(date(2025, 12, 4)).unwrap();

        assert_eq!(resolution.date, date(2025, 12, 3));
        assert_eq!(resolution.address, yesterday);
        assert_eq!(resolution.table.row_count(), 3);
        assert_eq!(
            resolution.report_label.as_deref(),
            Some("Reporte del 03-12-2025")
        );
    }

    #[test]
    fn exhaustion_records_every_attempt() {
        let transport = |address: &str| FetchError::Transport {
            address: address.to_string(),
            message: "connection refused".to_string(),
        };
        let fetcher = FakeFetcher {
            responses: HashMap::from([
                (
                    "https://reports.test/2025-12-04.csv".to_string(),
                    Err(transport("https://reports.test/2025-12-04.csv")),
                ),
                (
                    "https://reports.test/2025-12-03.csv".to_string(),
                    Err(transport("https://reports.test/2025-12-03.csv")),
                ),
            ]),
        };

        let resolver = Resolver::with_fetcher(test_config(), fetcher);
        let err = resolver.resolve(date(2025, 12, 4)).unwrap_err();

        match err {
            ResolveError::Exhausted { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert!(
                    attempts
                        .iter()
                        .all(|a| a.reason == FailureReason::Transport)
                );
                assert_eq!(attempts[0].date, date(2025, 12, 4));
                assert_eq!(attempts[1].date, date(2025, 12, 3));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn undecodable_candidate_falls_through_as_parse_failure() {
        // Today's file exists but the header offset exceeds its rows;
        // yesterday's file is complete.
        let fetcher = FakeFetcher {
            responses: HashMap::from([
                (
                    "https://reports.test/2025-12-04.csv".to_string(),
                    Ok(b"too,short\n".to_vec()),
                ),
                (
                    "https://reports.test/2025-12-03.csv".to_string(),
                    Ok(REPORT.as_bytes().to_vec()),
                ),
            ]),
        };

        let resolver = Resolver::with_fetcher(test_config(), fetcher);
        let resolution = resolver.resolve(date(2025, 12, 4)).unwrap();
        assert_eq!(resolution.date, date(2025, 12, 3));
    }

    #[test]
    fn schema_mismatch_aborts_instead_of_falling_back() {
        let fetcher = FakeFetcher {
            responses: HashMap::from([(
                "https://reports.test/2025-12-04.csv".to_string(),
                Ok(REPORT.as_bytes().to_vec()),
            )]),
        };

        let mut config = test_config();
        config.column_renames = Some(vec!["only-one-name".to_string()]);
        let resolver = Resolver::with_fetcher(config, fetcher);

        let err = resolver.resolve(date(2025, 12, 4)).unwrap_err();
        assert!(matches!(err, ResolveError::Schema(_)));
    }

    #[test]
    fn stops_at_first_success() {
        // Both days resolve; the reference date must win.
        let fetcher = FakeFetcher {
            responses: HashMap::from([
                (
                    "https://reports.test/2025-12-04.csv".to_string(),
                    Ok(REPORT.as_bytes().to_vec()),
                ),
                (
                    "https://reports.test/2025-12-03.csv".to_string(),
                    Ok(REPORT.as_bytes().to_vec()),
                ),
            ]),
        };

        let resolver = Resolver::with_fetcher(test_config(), fetcher);
        let resolution = resolver.resolve(date(2025, 12, 4)).unwrap();
        assert_eq!(resolution.date, date(2025, 12, 4));
    }
}
