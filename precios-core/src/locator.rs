//! Deterministic report address construction

use chrono::{Datelike, NaiveDate};

/// Substitute zero-padded date components into the address template.
/// Recognized tokens: `{yyyy}`, `{mm}`, `{dd}`. Every occurrence is
/// replaced, so templates may repeat a token (the ministry URL embeds the
/// month both as a path segment and inside the filename).
pub fn resolve_url(template: &str, date: NaiveDate) -> String {
    template
        .replace("{yyyy}", &format!("{:04}", date.year()))
        .replace("{mm}", &format!("{:02}", date.month()))
        .replace("{dd}", &format!("{:02}", date.day()))
}
