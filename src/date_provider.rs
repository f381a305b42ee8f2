use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Timelike};

/// Trait for providing the current date/time to the record store.
/// Timestamps carry the offset they were captured in, so the calendar date of
/// a registration is stable no matter where the report is rendered.
pub trait DateProvider: Send + Sync {
    fn get_current_time(&self) -> DateTime<FixedOffset>;

    fn today(&self) -> NaiveDate {
        self.get_current_time().date_naive()
    }
}

/// Default date provider that uses the system's local clock
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn get_current_time(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Date provider that uses an overridden date instead of system time
/// Preserves the current hours/minutes/seconds from the local clock
pub struct OverrideDateProvider {
    override_date: NaiveDate,
}

impl OverrideDateProvider {
    pub fn new(override_date: NaiveDate) -> Self {
        Self { override_date }
    }
}

impl DateProvider for OverrideDateProvider {
    fn get_current_time(&self) -> DateTime<FixedOffset> {
        let now = Local::now().fixed_offset();
        let naive_datetime = self
            .override_date
            .and_hms_opt(now.hour(), now.minute(), now.second())
            .unwrap_or_else(|| self.override_date.and_time(chrono::NaiveTime::MIN));
        now.offset()
            .from_local_datetime(&naive_datetime)
            .single()
            .unwrap_or(now)
    }
}

/// Always returns the same instant. Used for reproducible stores.
pub struct FixedDateProvider {
    instant: DateTime<FixedOffset>,
}

impl FixedDateProvider {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Noon UTC on the given day
    pub fn at_noon_utc(date: NaiveDate) -> Self {
        let noon = date.and_time(chrono::NaiveTime::MIN) + chrono::Duration::hours(12);
        Self::new(noon.and_utc().fixed_offset())
    }
}

impl DateProvider for FixedDateProvider {
    fn get_current_time(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}
