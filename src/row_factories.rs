use crate::models::{Bet, Lot, LotItem, Recruiter, Registration, RefundStatus};
use chrono::{DateTime, FixedOffset};
use rusqlite::Row;
use rusqlite::types::Type;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown refund status '{0}'")]
struct UnknownRefundStatus(String);

/// Parses an RFC 3339 text column, surfacing bad data as a conversion error
fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<FixedOffset>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Refund status is stored as its `as_str` text; anything else is bad data
fn refund_column(row: &Row, idx: usize) -> rusqlite::Result<RefundStatus> {
    let raw: String = row.get(idx)?;
    RefundStatus::from(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(UnknownRefundStatus(raw.clone())),
        )
    })
}

pub struct RecruiterRowFactory;

impl RecruiterRowFactory {
    /// Expected columns: id, name, active
    pub fn from_row(row: &Row) -> rusqlite::Result<Recruiter> {
        Ok(Recruiter {
            id: row.get(0)?,
            name: row.get(1)?,
            active: row.get::<_, i32>(2)? != 0,
        })
    }
}

pub struct BetRowFactory;

impl BetRowFactory {
    /// Expected columns: id, name
    pub fn from_row(row: &Row) -> rusqlite::Result<Bet> {
        Ok(Bet {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

pub struct LotRowFactory;

impl LotRowFactory {
    /// Expected columns: id, bet_id, created_at, observation
    pub fn from_row(row: &Row) -> rusqlite::Result<Lot> {
        Ok(Lot {
            id: row.get(0)?,
            bet_id: row.get(1)?,
            created_at: timestamp_column(row, 2)?,
            observation: row.get(3)?,
        })
    }
}

pub struct LotItemRowFactory;

impl LotItemRowFactory {
    /// Expected columns: id, lot_id, value_cents, planned_quantity
    pub fn from_row(row: &Row) -> rusqlite::Result<LotItem> {
        Ok(LotItem {
            id: row.get(0)?,
            lot_id: row.get(1)?,
            value_cents: row.get(2)?,
            planned_quantity: row.get(3)?,
        })
    }
}

/// Factory for creating Registration objects from database rows
pub struct RegistrationRowFactory;

impl RegistrationRowFactory {
    /// Expected columns: id, timestamp, recruiter_id, bet_id, value_cents,
    ///                   refund_status, observation, lot_id
    pub fn from_row(row: &Row) -> rusqlite::Result<Registration> {
        Ok(Registration {
            id: row.get(0)?,
            timestamp: timestamp_column(row, 1)?,
            recruiter_id: row.get(2)?,
            bet_id: row.get(3)?,
            value_cents: row.get(4)?,
            refund: refund_column(row, 5)?,
            observation: row.get(6)?,
            lot_id: row.get(7)?,
        })
    }
}
