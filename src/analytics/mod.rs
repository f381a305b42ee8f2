//! Derived figures for the dashboard.
//!
//! Everything here is a pure function over record slices: nothing is cached
//! and every call recomputes from its inputs, so calling twice on the same
//! data gives identical output. Sorting is always stable.

pub mod filter;
pub mod kpis;
pub mod lot_progress;
pub mod summaries;
pub mod weekly;

pub use filter::{Filters, filter_registrations};
pub use kpis::{Kpis, compute_kpis};
pub use lot_progress::{LotItemDetail, LotProgress, LotStatus, lot_item_detail, lot_progress};
pub use summaries::{
    BetSummary, RecruiterSummary, ValueSummary, summarize_by_bet, summarize_by_recruiter,
    summarize_by_value,
};
pub use weekly::{WeeklyBucket, compute_weekly, week_key};

/// `part * 100 / whole`, or 0 when `whole` is 0.
/// Scaling before dividing keeps exact quarters exact (23 of 80 is 28.75).
pub(crate) fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        (part as f64 * 100.0) / whole as f64
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_guards_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
