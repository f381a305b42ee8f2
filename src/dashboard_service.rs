use crate::analytics::{
    self, BetSummary, Filters, Kpis, LotItemDetail, LotProgress, RecruiterSummary, ValueSummary,
    WeeklyBucket,
};
use crate::database::Database;
use crate::error::Result;
use crate::models::{Bet, Recruiter, Registration};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;

/// Everything the dashboard page shows for one filter selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub filters: Filters,
    pub kpis: Kpis,
    pub by_bet: Vec<BetSummary>,
    pub by_recruiter: Vec<RecruiterSummary>,
    pub by_value: Vec<ValueSummary>,
    pub weekly: Vec<WeeklyBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDetail {
    pub progress: LotProgress,
    pub items: Vec<LotItemDetail>,
}

/// Reads the record store and runs the analytics over it.
/// Nothing is cached; every call sees the current contents of the store.
pub struct DashboardService<'a> {
    db: &'a Database,
}

impl<'a> DashboardService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Last 30 days up to today, every bet and recruiter, refunds included
    pub fn default_filters(&self) -> Filters {
        Filters::last_30_days(self.db.date_provider().today())
    }

    pub fn dashboard(&self, filters: &Filters) -> Result<DashboardReport> {
        let registrations = self.db.list_registrations()?;
        let bets = self.db.list_bets()?;
        let recruiters = self.db.list_recruiters()?;

        let filtered = analytics::filter_registrations(&registrations, filters);
        debug!(
            "Dashboard filter kept {} of {} registrations",
            filtered.len(),
            registrations.len()
        );
        warn_on_dangling_references(&filtered, &bets, &recruiters);

        Ok(DashboardReport {
            filters: filters.clone(),
            kpis: analytics::compute_kpis(&filtered),
            by_bet: analytics::summarize_by_bet(&filtered, &bets),
            by_recruiter: analytics::summarize_by_recruiter(&filtered, &recruiters),
            by_value: analytics::summarize_by_value(&filtered),
            weekly: analytics::compute_weekly(&filtered),
        })
    }

    /// Progress of every lot, newest first. Not affected by dashboard filters.
    pub fn lot_progress(&self) -> Result<Vec<LotProgress>> {
        Ok(analytics::lot_progress(
            &self.db.list_lots()?,
            &self.db.list_lot_items()?,
            &self.db.list_registrations()?,
            &self.db.list_bets()?,
        ))
    }

    /// `None` when the lot does not exist
    pub fn lot_detail(&self, lot_id: &str) -> Result<Option<LotDetail>> {
        let Some(lot) = self.db.get_lot(lot_id)? else {
            return Ok(None);
        };

        let items = self.db.list_lot_items_for(lot_id)?;
        let registrations = self.db.list_registrations()?;
        let bets = self.db.list_bets()?;

        let progress = analytics::lot_progress(std::slice::from_ref(&lot), &items, &registrations, &bets)
            .into_iter()
            .next();

        Ok(progress.map(|progress| LotDetail {
            progress,
            items: analytics::lot_item_detail(lot_id, &items, &registrations),
        }))
    }
}

fn warn_on_dangling_references(filtered: &[Registration], bets: &[Bet], recruiters: &[Recruiter]) {
    let bet_ids: HashSet<&str> = bets.iter().map(|b| b.id.as_str()).collect();
    let recruiter_ids: HashSet<&str> = recruiters.iter().map(|r| r.id.as_str()).collect();

    let orphaned = filtered
        .iter()
        .filter(|r| {
            !bet_ids.contains(r.bet_id.as_str()) || !recruiter_ids.contains(r.recruiter_id.as_str())
        })
        .count();

    if orphaned > 0 {
        warn!(
            "{} registration(s) reference a deleted bet or recruiter and are left out of the grouped summaries",
            orphaned
        );
    }
}
