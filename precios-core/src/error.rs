//! Error taxonomy for the resolution pipeline

use thiserror::Error;

/// Errors raised by a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream explicitly reported the resource missing (HTTP 404).
    /// Distinct from `Transport` so the resolver can fall through to the
    /// next candidate date without treating it as an outage.
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("transport failure for {address}: {message}")]
    Transport { address: String, message: String },
}

/// Errors raised while decoding a payload into a table
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot decode payload as {format}: {message}")]
    Decode { format: &'static str, message: String },

    #[error("sheet not found in workbook: {0}")]
    SheetNotFound(String),

    #[error("header row offset {offset} is beyond the {rows} available rows")]
    HeaderOffsetOutOfRange { offset: usize, rows: usize },
}

/// Configuration-level schema defects. These are never recovered by trying
/// another candidate date; they mean the deployment config no longer matches
/// the upstream file shape.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("column rename list has {provided} names but the table has {expected} columns")]
    RenameCountMismatch { expected: usize, provided: usize },
}

/// Terminal failure of a whole resolution cycle
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no report available: all {} candidate dates failed", .attempts.len())]
    Exhausted { attempts: Vec<crate::resolve::Attempt> },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
