use std::time::Duration;

use serde::Serialize;

use crate::domain::market_hours::{
    AvailabilityState, CalendarEntry, HolidayCategory, MarketHoursConfig, MonthDay, Verdict,
};

const WEEKDAY_NAMES: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// Point-in-time view of the subsystem for host tooling and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub state: AvailabilityState,
    pub reason: String,
    pub timezone: String,
    pub check_interval_ms: u64,
    pub reference_time: String,
    pub weekday: String,
    pub market_open: String,
    pub weekend_close: String,
    pub weekday_close: Option<String>,
    pub running: bool,
    pub blurred: bool,
    pub calendar_loaded: bool,
    pub holiday_count: usize,
}

impl StatusSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn describe(
        verdict: &Verdict,
        timezone: &str,
        check_interval: Duration,
        config: &MarketHoursConfig,
        running: bool,
        blurred: bool,
        calendar_loaded: bool,
        holiday_count: usize,
    ) -> Self {
        Self {
            state: verdict.state,
            reason: verdict.reason.to_string(),
            timezone: timezone.to_string(),
            check_interval_ms: u64::try_from(check_interval.as_millis()).unwrap_or(u64::MAX),
            reference_time: verdict.at.to_string(),
            weekday: WEEKDAY_NAMES[verdict.at.weekday_number() as usize].to_string(),
            market_open: config.open().to_string(),
            weekend_close: config.weekend_close().to_string(),
            weekday_close: config.weekday_close().map(|close| close.to_string()),
            running,
            blurred,
            calendar_loaded,
            holiday_count,
        }
    }
}

/// One row of a yearly holiday listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayListing {
    pub month_day: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    pub category: HolidayCategory,
}

impl From<(MonthDay, CalendarEntry)> for HolidayListing {
    fn from((month_day, entry): (MonthDay, CalendarEntry)) -> Self {
        Self {
            month_day: month_day.to_string(),
            name: entry.name,
            name_en: entry.name_en,
            category: entry.category,
        }
    }
}
