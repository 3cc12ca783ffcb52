use chrono::{DateTime, Duration, Utc};

/// Calendar unit accepted by [`DateProvider::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl DurationUnit {
    /// `None` when `amount` of this unit does not fit in a `Duration`
    pub fn duration(self, amount: i64) -> Option<Duration> {
        match self {
            DurationUnit::Minute => Duration::try_minutes(amount),
            DurationUnit::Hour => Duration::try_hours(amount),
            DurationUnit::Day => Duration::try_days(amount),
            DurationUnit::Week => Duration::try_weeks(amount),
        }
    }
}

/// Source of timestamps and date arithmetic for request handling
pub trait DateProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// `None` when the result falls outside the representable date range
    fn add(&self, at: DateTime<Utc>, amount: i64, unit: DurationUnit) -> Option<DateTime<Utc>> {
        at.checked_add_signed(unit.duration(amount)?)
    }
}

/// Wall-clock provider used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Provider pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedDateProvider(pub DateTime<Utc>);

impl DateProvider for FixedDateProvider {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
