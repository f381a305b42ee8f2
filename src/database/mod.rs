pub mod bets;
pub mod connection;
pub mod lot_items;
pub mod lots;
pub mod recruiters;
pub mod registrations;

use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::error::Result;
use crate::id_generator::{IdGenerator, UuidIdGenerator};
use crate::models::{
    Bet, Lot, LotDraft, LotItem, Recruiter, RecruiterUpdate, Registration, RegistrationDraft,
};
use crate::validation::{validate_lot, validate_registration, validate_unique_name};
use chrono::{DateTime, FixedOffset};
use log::{debug, info};
use rusqlite::Connection;
use std::sync::Arc;

pub use bets::BetsRepository;
pub use lot_items::LotItemsRepository;
pub use lots::LotsRepository;
pub use recruiters::RecruitersRepository;
pub use registrations::RegistrationsRepository;

/// Record store facade: owns the connection plus the clock and the identity
/// source used for new records
pub struct Database {
    pub conn: Connection,
    date_provider: Arc<dyn DateProvider>,
    id_generator: Arc<dyn IdGenerator>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        Self::with_providers(db_path, Arc::new(SystemDateProvider), Arc::new(UuidIdGenerator))
    }

    pub fn with_providers(
        db_path: &str,
        date_provider: Arc<dyn DateProvider>,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let conn = connection::init_connection(db_path)?;
        Ok(Database {
            conn,
            date_provider,
            id_generator,
        })
    }

    pub fn get_current_time(&self) -> DateTime<FixedOffset> {
        self.date_provider.get_current_time()
    }

    pub fn date_provider(&self) -> &dyn DateProvider {
        self.date_provider.as_ref()
    }

    pub fn next_id(&self) -> String {
        self.id_generator.next_id()
    }

    // ===== Recruiters =====

    pub fn create_recruiter(&self, name: &str, active: bool) -> Result<Recruiter> {
        let existing = self.list_recruiters()?;
        let name = validate_unique_name(
            "recruiter",
            name,
            existing.iter().map(|r| (r.id.as_str(), r.name.as_str())),
            None,
        )?;

        let recruiter = Recruiter {
            id: self.next_id(),
            name,
            active,
        };
        RecruitersRepository::new(&self.conn).insert(&recruiter)?;
        info!("Created recruiter {} ({})", recruiter.name, recruiter.id);
        Ok(recruiter)
    }

    pub fn get_recruiter(&self, recruiter_id: &str) -> Result<Option<Recruiter>> {
        Ok(RecruitersRepository::new(&self.conn).get(recruiter_id)?)
    }

    pub fn list_recruiters(&self) -> Result<Vec<Recruiter>> {
        Ok(RecruitersRepository::new(&self.conn).list()?)
    }

    /// Returns `None` when the recruiter does not exist
    pub fn update_recruiter(
        &self,
        recruiter_id: &str,
        update: &RecruiterUpdate,
    ) -> Result<Option<Recruiter>> {
        let repo = RecruitersRepository::new(&self.conn);
        let Some(mut recruiter) = repo.get(recruiter_id)? else {
            return Ok(None);
        };

        if let Some(name) = &update.name {
            let existing = repo.list()?;
            recruiter.name = validate_unique_name(
                "recruiter",
                name,
                existing.iter().map(|r| (r.id.as_str(), r.name.as_str())),
                Some(recruiter_id),
            )?;
        }
        if let Some(active) = update.active {
            recruiter.active = active;
        }

        repo.update(&recruiter)?;
        Ok(Some(recruiter))
    }

    pub fn set_recruiter_active(&self, recruiter_id: &str, active: bool) -> Result<Option<Recruiter>> {
        self.update_recruiter(
            recruiter_id,
            &RecruiterUpdate {
                name: None,
                active: Some(active),
            },
        )
    }

    /// Registrations keep pointing at the deleted id
    pub fn delete_recruiter(&self, recruiter_id: &str) -> Result<bool> {
        Ok(RecruitersRepository::new(&self.conn).delete(recruiter_id)?)
    }

    pub fn count_recruiters(&self) -> Result<i64> {
        Ok(RecruitersRepository::new(&self.conn).count()?)
    }

    // ===== Bets =====

    pub fn create_bet(&self, name: &str) -> Result<Bet> {
        let existing = self.list_bets()?;
        let name = validate_unique_name(
            "bet",
            name,
            existing.iter().map(|b| (b.id.as_str(), b.name.as_str())),
            None,
        )?;

        let bet = Bet {
            id: self.next_id(),
            name,
        };
        BetsRepository::new(&self.conn).insert(&bet)?;
        info!("Created bet {} ({})", bet.name, bet.id);
        Ok(bet)
    }

    pub fn get_bet(&self, bet_id: &str) -> Result<Option<Bet>> {
        Ok(BetsRepository::new(&self.conn).get(bet_id)?)
    }

    pub fn list_bets(&self) -> Result<Vec<Bet>> {
        Ok(BetsRepository::new(&self.conn).list()?)
    }

    pub fn update_bet(&self, bet_id: &str, name: &str) -> Result<Option<Bet>> {
        let repo = BetsRepository::new(&self.conn);
        if repo.get(bet_id)?.is_none() {
            return Ok(None);
        }

        let existing = repo.list()?;
        let name = validate_unique_name(
            "bet",
            name,
            existing.iter().map(|b| (b.id.as_str(), b.name.as_str())),
            Some(bet_id),
        )?;

        let bet = Bet {
            id: bet_id.to_string(),
            name,
        };
        repo.update(&bet)?;
        Ok(Some(bet))
    }

    /// Lots and registrations of the bet are kept
    pub fn delete_bet(&self, bet_id: &str) -> Result<bool> {
        Ok(BetsRepository::new(&self.conn).delete(bet_id)?)
    }

    pub fn count_bets(&self) -> Result<i64> {
        Ok(BetsRepository::new(&self.conn).count()?)
    }

    // ===== Lots =====

    /// Creates a lot and all of its items in one transaction
    pub fn save_lot(&self, draft: &LotDraft) -> Result<Lot> {
        validate_lot(draft)?;

        let lot = Lot {
            id: self.next_id(),
            bet_id: draft.bet_id.clone(),
            created_at: self.get_current_time(),
            observation: draft.observation.clone(),
        };

        let tx = self.conn.unchecked_transaction()?;
        LotsRepository::new(&tx).insert(&lot)?;
        self.insert_lot_items(&tx, &lot.id, draft)?;
        tx.commit()?;

        info!(
            "Created lot {} for bet {} with {} item(s)",
            lot.id,
            lot.bet_id,
            draft.items.len()
        );
        Ok(lot)
    }

    /// Replaces bet, observation and every item of an existing lot.
    /// Creation time and linked registrations are untouched.
    pub fn update_lot(&self, lot_id: &str, draft: &LotDraft) -> Result<Option<Lot>> {
        validate_lot(draft)?;

        let Some(mut lot) = self.get_lot(lot_id)? else {
            return Ok(None);
        };
        lot.bet_id = draft.bet_id.clone();
        lot.observation = draft.observation.clone();

        let tx = self.conn.unchecked_transaction()?;
        LotsRepository::new(&tx).update(&lot)?;
        let removed = LotItemsRepository::new(&tx).delete_for_lot(lot_id)?;
        self.insert_lot_items(&tx, lot_id, draft)?;
        tx.commit()?;

        debug!("Replaced {} item(s) of lot {}", removed, lot_id);
        Ok(Some(lot))
    }

    fn insert_lot_items(&self, conn: &Connection, lot_id: &str, draft: &LotDraft) -> Result<()> {
        let repo = LotItemsRepository::new(conn);
        for item in &draft.items {
            repo.insert(&LotItem {
                id: self.next_id(),
                lot_id: lot_id.to_string(),
                value_cents: item.value_cents,
                planned_quantity: item.planned_quantity,
            })?;
        }
        Ok(())
    }

    pub fn get_lot(&self, lot_id: &str) -> Result<Option<Lot>> {
        Ok(LotsRepository::new(&self.conn).get(lot_id)?)
    }

    pub fn list_lots(&self) -> Result<Vec<Lot>> {
        Ok(LotsRepository::new(&self.conn).list()?)
    }

    /// Deletes the lot with its items. Registrations linked to it keep the id.
    pub fn delete_lot(&self, lot_id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        LotItemsRepository::new(&tx).delete_for_lot(lot_id)?;
        let deleted = LotsRepository::new(&tx).delete(lot_id)?;
        tx.commit()?;
        Ok(deleted)
    }

    pub fn list_lot_items(&self) -> Result<Vec<LotItem>> {
        Ok(LotItemsRepository::new(&self.conn).list()?)
    }

    pub fn list_lot_items_for(&self, lot_id: &str) -> Result<Vec<LotItem>> {
        Ok(LotItemsRepository::new(&self.conn).list_for_lot(lot_id)?)
    }

    pub fn count_lots(&self) -> Result<i64> {
        Ok(LotsRepository::new(&self.conn).count()?)
    }

    // ===== Registrations =====

    /// Stamps the registration with the current time
    pub fn create_registration(&self, draft: &RegistrationDraft) -> Result<Registration> {
        validate_registration(draft)?;

        let registration = Registration {
            id: self.next_id(),
            timestamp: self.get_current_time(),
            recruiter_id: draft.recruiter_id.clone(),
            bet_id: draft.bet_id.clone(),
            value_cents: draft.value_cents,
            refund: draft.refund,
            observation: draft.observation.clone(),
            lot_id: draft.lot_id.clone(),
        };
        RegistrationsRepository::new(&self.conn).insert(&registration)?;
        Ok(registration)
    }

    /// Stores a fully-formed registration as is, timestamp included.
    /// Used when loading historical or sample data.
    pub fn import_registration(&self, registration: &Registration) -> Result<()> {
        validate_registration(&RegistrationDraft {
            recruiter_id: registration.recruiter_id.clone(),
            bet_id: registration.bet_id.clone(),
            value_cents: registration.value_cents,
            refund: registration.refund,
            observation: None,
            lot_id: None,
        })?;
        Ok(RegistrationsRepository::new(&self.conn).insert(registration)?)
    }

    /// Applies the draft; the original timestamp is always kept
    pub fn update_registration(
        &self,
        registration_id: &str,
        draft: &RegistrationDraft,
    ) -> Result<Option<Registration>> {
        validate_registration(draft)?;

        let repo = RegistrationsRepository::new(&self.conn);
        let Some(existing) = repo.get(registration_id)? else {
            return Ok(None);
        };

        let updated = Registration {
            id: existing.id,
            timestamp: existing.timestamp,
            recruiter_id: draft.recruiter_id.clone(),
            bet_id: draft.bet_id.clone(),
            value_cents: draft.value_cents,
            refund: draft.refund,
            observation: draft.observation.clone(),
            lot_id: draft.lot_id.clone(),
        };
        repo.update(&updated)?;
        Ok(Some(updated))
    }

    pub fn get_registration(&self, registration_id: &str) -> Result<Option<Registration>> {
        Ok(RegistrationsRepository::new(&self.conn).get(registration_id)?)
    }

    pub fn list_registrations(&self) -> Result<Vec<Registration>> {
        Ok(RegistrationsRepository::new(&self.conn).list()?)
    }

    pub fn delete_registration(&self, registration_id: &str) -> Result<bool> {
        Ok(RegistrationsRepository::new(&self.conn).delete(registration_id)?)
    }

    pub fn count_registrations(&self) -> Result<i64> {
        Ok(RegistrationsRepository::new(&self.conn).count()?)
    }
}
