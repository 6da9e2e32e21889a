use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use derive_more::Display;

use super::config::MarketHoursConfig;
use super::repositories::CalendarStore;
use super::value_objects::{AvailabilityState, MarketInstant, TimeOfDay};
use crate::domain::errors::{ConfigError, ConfigResult};

/// The quote page's home market.
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::Asia::Bangkok;

/// Which rule decided the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AvailabilityReason {
    #[display(fmt = "Weekend: market closed on Sunday")]
    Sunday,
    #[display(fmt = "Weekend: market closed from Saturday {}", _0)]
    SaturdayAfterClose(TimeOfDay),
    #[display(fmt = "Holiday: {}", _0)]
    Holiday(String),
    #[display(fmt = "After holiday ({}): market reopens at {}", holiday, reopens_at)]
    AfterHoliday { holiday: String, reopens_at: TimeOfDay },
    #[display(fmt = "Before market open at {}", _0)]
    BeforeOpen(TimeOfDay),
    #[display(fmt = "After market close at {}", _0)]
    AfterClose(TimeOfDay),
    #[display(fmt = "Market open")]
    Open,
}

/// Engine output: state, the rule that produced it, and the normalised instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub state: AvailabilityState,
    pub reason: AvailabilityReason,
    pub at: MarketInstant,
}

impl Verdict {
    fn closed(reason: AvailabilityReason, at: MarketInstant) -> Self {
        Self { state: AvailabilityState::Closed, reason, at }
    }

    fn open(at: MarketInstant) -> Self {
        Self { state: AvailabilityState::Open, reason: AvailabilityReason::Open, at }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }
}

/// Classifies an instant as OPEN or CLOSED against market hours and holidays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityEngine {
    timezone: Tz,
}

impl Default for AvailabilityEngine {
    fn default() -> Self {
        Self::new(REFERENCE_TIMEZONE)
    }
}

impl AvailabilityEngine {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Build from an IANA name such as `Asia/Bangkok`.
    pub fn for_timezone(name: &str) -> ConfigResult<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn normalize(&self, now: DateTime<Utc>) -> MarketInstant {
        MarketInstant::from_local(&now.with_timezone(&self.timezone))
    }

    pub fn evaluate(&self, now: DateTime<Utc>, config: &MarketHoursConfig, calendar: &CalendarStore) -> Verdict {
        self.evaluate_at(self.normalize(now), config, calendar)
    }

    /// Rules are hard gates checked top-down; the first match wins.
    pub fn evaluate_at(&self, at: MarketInstant, config: &MarketHoursConfig, calendar: &CalendarStore) -> Verdict {
        let minutes = at.minutes();
        let open = config.open();

        match at.weekday() {
            Weekday::Sun => return Verdict::closed(AvailabilityReason::Sunday, at),
            Weekday::Sat if minutes >= config.weekend_close().minutes() => {
                return Verdict::closed(AvailabilityReason::SaturdayAfterClose(config.weekend_close()), at);
            }
            _ => {}
        }

        if let Some(holiday) = calendar.entry_for(at.date()) {
            return Verdict::closed(AvailabilityReason::Holiday(holiday.display_name().to_string()), at);
        }

        if minutes < open.minutes() {
            if let Some(holiday) = at.previous_date().and_then(|date| calendar.entry_for(date)) {
                return Verdict::closed(
                    AvailabilityReason::AfterHoliday { holiday: holiday.display_name().to_string(), reopens_at: open },
                    at,
                );
            }
            if at.is_weekday() {
                return Verdict::closed(AvailabilityReason::BeforeOpen(open), at);
            }
        }

        if let Some(close) = config.weekday_close() {
            if at.is_weekday() && minutes >= close.minutes() {
                return Verdict::closed(AvailabilityReason::AfterClose(close), at);
            }
        }

        Verdict::open(at)
    }
}
