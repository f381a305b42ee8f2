use crate::models::Registration;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Dashboard filter. Empty `bets`/`recruiters` sets mean "every bet" /
/// "every recruiter", not "none".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bets: BTreeSet<String>,
    pub recruiters: BTreeSet<String>,
    pub include_refunded: bool,
}

impl Filters {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Filters {
            start_date,
            end_date,
            bets: BTreeSet::new(),
            recruiters: BTreeSet::new(),
            include_refunded: true,
        }
    }

    /// Default dashboard window: the 30 days before `today` through `today`
    pub fn last_30_days(today: NaiveDate) -> Self {
        Self::new(today - Duration::days(30), today)
    }

    pub fn matches(&self, registration: &Registration) -> bool {
        let day = registration.timestamp.date_naive();
        if day < self.start_date || day > self.end_date {
            return false;
        }

        if !self.bets.is_empty() && !self.bets.contains(&registration.bet_id) {
            return false;
        }

        if !self.recruiters.is_empty() && !self.recruiters.contains(&registration.recruiter_id) {
            return false;
        }

        self.include_refunded || !registration.is_refunded()
    }
}

/// Keeps the registrations accepted by `filters`, in their original order
pub fn filter_registrations(all: &[Registration], filters: &Filters) -> Vec<Registration> {
    all.iter()
        .filter(|registration| filters.matches(registration))
        .cloned()
        .collect()
}
