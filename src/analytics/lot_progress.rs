use super::percentage;
use crate::models::{Bet, Cents, Lot, LotItem, Registration};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    Pending,
    InProgress,
    Complete,
}

impl LotStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LotStatus::Pending => "pending",
            LotStatus::InProgress => "in_progress",
            LotStatus::Complete => "complete",
        }
    }
}

/// Planned vs executed for a whole lot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotProgress {
    pub lot: Lot,
    /// `None` when the lot's bet has been deleted
    pub bet: Option<Bet>,
    pub planned_total: i64,
    pub executed_total: i64,
    pub remaining_total: i64,
}

impl LotProgress {
    /// Executed share of the plan in percent, capped at 100; 0 for an empty plan
    pub fn progress_percentage(&self) -> f64 {
        capped_progress(self.executed_total, self.planned_total)
    }

    pub fn status(&self) -> LotStatus {
        if self.remaining_total == 0 {
            LotStatus::Complete
        } else if self.executed_total > 0 {
            LotStatus::InProgress
        } else {
            LotStatus::Pending
        }
    }
}

/// Planned vs executed for one value inside a lot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotItemDetail {
    pub value_cents: Cents,
    pub planned: i64,
    pub executed: i64,
    pub remaining: i64,
}

impl LotItemDetail {
    /// Same rule as `LotProgress::progress_percentage`, for one value
    pub fn progress_percentage(&self) -> f64 {
        capped_progress(self.executed, self.planned)
    }
}

fn remaining(planned: i64, executed: i64) -> i64 {
    (planned - executed).max(0)
}

fn capped_progress(executed: i64, planned: i64) -> f64 {
    percentage(executed, planned).min(100.0)
}

/// Progress of every lot, most recently created first.
///
/// Every registration linked to a lot counts as executed whatever its value.
/// This view ignores the dashboard filters.
pub fn lot_progress(
    lots: &[Lot],
    lot_items: &[LotItem],
    registrations: &[Registration],
    bets: &[Bet],
) -> Vec<LotProgress> {
    let mut planned: HashMap<&str, i64> = HashMap::new();
    for item in lot_items {
        *planned.entry(item.lot_id.as_str()).or_default() += item.planned_quantity;
    }

    let mut executed: HashMap<&str, i64> = HashMap::new();
    for registration in registrations {
        if let Some(lot_id) = registration.lot_id.as_deref() {
            *executed.entry(lot_id).or_default() += 1;
        }
    }

    let mut progress: Vec<LotProgress> = lots
        .iter()
        .map(|lot| {
            let planned_total = planned.get(lot.id.as_str()).copied().unwrap_or(0);
            let executed_total = executed.get(lot.id.as_str()).copied().unwrap_or(0);
            LotProgress {
                lot: lot.clone(),
                bet: bets.iter().find(|bet| bet.id == lot.bet_id).cloned(),
                planned_total,
                executed_total,
                remaining_total: remaining(planned_total, executed_total),
            }
        })
        .collect();

    progress.sort_by(|a, b| b.lot.created_at.cmp(&a.lot.created_at));
    progress
}

/// Per-value breakdown of one lot, ascending by value.
///
/// A registration counts toward the item whose value equals its own exactly.
pub fn lot_item_detail(
    lot_id: &str,
    lot_items: &[LotItem],
    registrations: &[Registration],
) -> Vec<LotItemDetail> {
    let linked: Vec<&Registration> = registrations
        .iter()
        .filter(|r| r.lot_id.as_deref() == Some(lot_id))
        .collect();

    let mut details: Vec<LotItemDetail> = lot_items
        .iter()
        .filter(|item| item.lot_id == lot_id)
        .map(|item| {
            let executed = linked
                .iter()
                .filter(|r| r.value_cents == item.value_cents)
                .count() as i64;
            LotItemDetail {
                value_cents: item.value_cents,
                planned: item.planned_quantity,
                executed,
                remaining: remaining(item.planned_quantity, executed),
            }
        })
        .collect();

    details.sort_by_key(|detail| detail.value_cents);
    details
}
