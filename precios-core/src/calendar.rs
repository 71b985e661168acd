//! Candidate date generation for the fallback window

use chrono::{Days, NaiveDate};

/// Produce the ordered sequence of dates to try: the reference date first,
/// then one day back at a time, `max_lookback + 1` dates in total.
pub fn candidates(reference: NaiveDate, max_lookback: u32) -> Vec<NaiveDate> {
    (0..=u64::from(max_lookback))
        .map(|back| reference - Days::new(back))
        .collect()
}
