use crate::database::Database;
use crate::date_provider::{
    DateProvider, FixedDateProvider, OverrideDateProvider, SystemDateProvider,
};
use crate::error::Result;
use crate::id_generator::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
use chrono::{DateTime, FixedOffset, NaiveDate};
use log::debug;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "bancas.db";

/// How the current time is obtained by the store
#[derive(Debug, Clone, PartialEq)]
pub enum Clock {
    System,
    /// Today's time of day on a chosen date
    OverrideDate(NaiveDate),
    Fixed(DateTime<FixedOffset>),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Whether to use in-memory database
    pub is_test_mode: bool,
    /// Custom database file path (ignored if in test mode)
    pub custom_path: Option<String>,
    pub clock: Clock,
    /// When set, ids are `prefix_1`, `prefix_2`, ... instead of UUIDs
    pub id_prefix: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            is_test_mode: false,
            custom_path: None,
            clock: Clock::System,
            id_prefix: None,
        }
    }
}

impl DatabaseConfig {
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::default()
    }

    /// Gets the effective database path
    pub fn get_path(&self) -> &str {
        if self.is_test_mode {
            ":memory:"
        } else {
            self.custom_path.as_deref().unwrap_or(DEFAULT_DB_PATH)
        }
    }

    fn date_provider(&self) -> Arc<dyn DateProvider> {
        match &self.clock {
            Clock::System => Arc::new(SystemDateProvider),
            Clock::OverrideDate(date) => Arc::new(OverrideDateProvider::new(*date)),
            Clock::Fixed(instant) => Arc::new(FixedDateProvider::new(*instant)),
        }
    }

    fn id_generator(&self) -> Arc<dyn IdGenerator> {
        match &self.id_prefix {
            Some(prefix) => Arc::new(SequentialIdGenerator::new(prefix)),
            None => Arc::new(UuidIdGenerator),
        }
    }
}

#[derive(Debug, Default)]
pub struct DatabaseConfigBuilder {
    config: DatabaseConfig,
}

impl DatabaseConfigBuilder {
    pub fn test_mode(mut self) -> Self {
        self.config.is_test_mode = true;
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.config.custom_path = Some(path.to_string());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.config.clock = Clock::OverrideDate(date);
        self
    }

    /// Convenience for `date`; invalid dates leave the clock unchanged
    pub fn date_ymd(self, year: i32, month: u32, day: u32) -> Self {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => self.date(date),
            None => self,
        }
    }

    pub fn fixed_time(mut self, instant: DateTime<FixedOffset>) -> Self {
        self.config.clock = Clock::Fixed(instant);
        self
    }

    pub fn sequential_ids(mut self, prefix: &str) -> Self {
        self.config.id_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(self) -> DatabaseConfig {
        self.config
    }
}

/// Factory for creating Database instances
pub struct DatabaseFactory;

impl DatabaseFactory {
    /// Creates a database with the specified configuration
    pub fn create(config: DatabaseConfig) -> Result<Database> {
        let path = config.get_path();
        debug!("Opening record store at {}", path);
        Database::with_providers(path, config.date_provider(), config.id_generator())
    }
}
