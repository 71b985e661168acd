//! precios-core: dated market-price report resolution and search
//!
//! The agriculture ministry publishes a daily price report whose download
//! URL embeds the publication date, and skips days without notice. This
//! library turns that into a predictable pipeline: generate candidate dates
//! (today, then backwards), build each candidate's address, fetch it, parse
//! the workbook or CSV into a uniform table, clean it up, and expose a
//! case-insensitive substring search over the result. All layout-dependent
//! constants (URL template, header offset, drop list, renames) are
//! configuration, never code.

pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod normalize;
pub mod parser;
pub mod resolve;
pub mod search;
pub mod table;

pub use cache::{CacheKey, Outcome, ResolutionCache};
pub use config::ReportConfig;
pub use error::{FetchError, ParseError, ResolveError, SchemaError};
pub use fetch::{Fetcher, HttpFetcher, PayloadFormat, RawPayload};
pub use resolve::{Attempt, FailureReason, Resolution, Resolver};
pub use table::{CellValue, Column, Table};
