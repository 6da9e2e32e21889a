use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Weekday};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::domain::errors::{ConfigError, ConfigResult};

const MINUTES_PER_HOUR: u32 = 60;

/// Value Object - wall-clock time in the reference timezone, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "TimeOfDayRepr", into = "TimeOfDayRepr")]
#[display(fmt = "{:02}:{:02}", hour, minute)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> ConfigResult<Self> {
        if hour > 23 {
            return Err(ConfigError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(ConfigError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    pub const fn midnight() -> Self {
        Self { hour: 0, minute: 0 }
    }

    /// For in-range literals only.
    pub(crate) const fn literal(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes since midnight, the unit every market-hours comparison uses.
    pub fn minutes(&self) -> u32 {
        self.hour * MINUTES_PER_HOUR + self.minute
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TimeOfDayRepr {
    hour: u32,
    minute: u32,
}

impl TryFrom<TimeOfDayRepr> for TimeOfDay {
    type Error = ConfigError;

    fn try_from(repr: TimeOfDayRepr) -> Result<Self, Self::Error> {
        TimeOfDay::new(repr.hour, repr.minute)
    }
}

impl From<TimeOfDay> for TimeOfDayRepr {
    fn from(time: TimeOfDay) -> Self {
        Self { hour: time.hour, minute: time.minute }
    }
}

/// Value Object - calendar key "MM-DD", scoped to a year by the calendar.
///
/// Ordered by month then day so yearly listings come out ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Accepts any day that exists in a leap year, so `02-29` is a valid key.
    pub fn new(month: u32, day: u32) -> ConfigResult<Self> {
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(ConfigError::InvalidMonthDay(format!("{:02}-{:02}", month, day)));
        }
        Ok(Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self { month: date.month(), day: date.day() }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidMonthDay(value.to_string());
        let (month, day) = value.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        MonthDay::new(month, day)
    }
}

impl TryFrom<String> for MonthDay {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

/// Whether live prices may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AvailabilityState {
    Open,
    Closed,
}

impl AvailabilityState {
    pub fn is_open(&self) -> bool {
        matches!(self, AvailabilityState::Open)
    }
}

/// "Now" normalised into the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketInstant {
    date: NaiveDate,
    time: TimeOfDay,
}

impl MarketInstant {
    pub fn from_local<Tz: TimeZone>(local: &DateTime<Tz>) -> Self {
        Self {
            date: local.date_naive(),
            time: TimeOfDay { hour: local.hour(), minute: local.minute() },
        }
    }

    pub fn new(date: NaiveDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn previous_date(&self) -> Option<NaiveDate> {
        self.date.pred_opt()
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn hour(&self) -> u32 {
        self.time.hour
    }

    pub fn minute(&self) -> u32 {
        self.time.minute
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn weekday_number(&self) -> u32 {
        self.weekday().num_days_from_sunday()
    }

    pub fn minutes(&self) -> u32 {
        self.time.minutes()
    }

    pub fn is_weekday(&self) -> bool {
        !matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for MarketInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_rejects_out_of_range() {
        assert_eq!(TimeOfDay::new(24, 0), Err(ConfigError::HourOutOfRange(24)));
        assert_eq!(TimeOfDay::new(5, 60), Err(ConfigError::MinuteOutOfRange(60)));
        assert_eq!(TimeOfDay::new(23, 59).map(|t| t.minutes()), Ok(1439));
    }

    #[test]
    fn month_day_parses_zero_padded_keys() {
        let md: MonthDay = "04-06".parse().unwrap();
        assert_eq!((md.month(), md.day()), (4, 6));
        assert_eq!(md.to_string(), "04-06");
        assert!("4-06".parse::<MonthDay>().is_err());
        assert!("13-01".parse::<MonthDay>().is_err());
        assert!("02-30".parse::<MonthDay>().is_err());
        assert!("02-29".parse::<MonthDay>().is_ok());
    }

    #[test]
    fn month_days_sort_by_month_then_day() {
        let mut keys: Vec<MonthDay> = ["12-31", "01-02", "01-10"].iter().map(|k| k.parse().unwrap()).collect();
        keys.sort();
        let printed: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(printed, vec!["01-02", "01-10", "12-31"]);
    }

    #[test]
    fn state_renders_uppercase() {
        assert_eq!(AvailabilityState::Closed.to_string(), "CLOSED");
        assert_eq!("OPEN".parse::<AvailabilityState>().unwrap(), AvailabilityState::Open);
    }

    #[test]
    fn weekday_numbering_starts_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let instant = MarketInstant::new(sunday, TimeOfDay::midnight());
        assert_eq!(instant.weekday_number(), 0);
        assert!(!instant.is_weekday());
    }
}
