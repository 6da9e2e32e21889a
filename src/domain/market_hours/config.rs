use serde::{Deserialize, Serialize};

use super::value_objects::TimeOfDay;
use crate::domain::errors::{ConfigError, ConfigResult};

/// Trading-session boundaries in the reference timezone.
///
/// Fields only change through the setters, which validate before mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketHoursConfig {
    open: TimeOfDay,
    weekend_close: TimeOfDay,
    weekday_close: Option<TimeOfDay>,
}

impl Default for MarketHoursConfig {
    /// Global silver session: weekdays from 05:00, weekend from Saturday 04:00.
    fn default() -> Self {
        Self {
            open: TimeOfDay::literal(5, 0),
            weekend_close: TimeOfDay::literal(4, 0),
            weekday_close: None,
        }
    }
}

impl MarketHoursConfig {
    pub fn new(open: TimeOfDay, weekend_close: TimeOfDay) -> Self {
        Self { open, weekend_close, weekday_close: None }
    }

    pub fn with_weekday_close(mut self, close: TimeOfDay) -> Self {
        self.weekday_close = Some(close);
        self
    }

    pub fn open(&self) -> TimeOfDay {
        self.open
    }

    pub fn weekend_close(&self) -> TimeOfDay {
        self.weekend_close
    }

    pub fn weekday_close(&self) -> Option<TimeOfDay> {
        self.weekday_close
    }

    pub fn set_market_open(&mut self, hour: u32, minute: u32) -> ConfigResult<()> {
        self.open = TimeOfDay::new(hour, minute)?;
        Ok(())
    }

    pub fn set_weekend_close(&mut self, hour: u32, minute: u32) -> ConfigResult<()> {
        self.weekend_close = TimeOfDay::new(hour, minute)?;
        Ok(())
    }

    pub fn set_weekday_close(&mut self, close: Option<(u32, u32)>) -> ConfigResult<()> {
        self.weekday_close = match close {
            Some((hour, minute)) => Some(TimeOfDay::new(hour, minute)?),
            None => None,
        };
        Ok(())
    }
}

/// Pairs the optional hour and minute of a weekday close as passed by a host.
/// No hour means "no weekday close"; a minute without an hour is rejected.
pub fn weekday_close_parts(hour: Option<u32>, minute: Option<u32>) -> ConfigResult<Option<(u32, u32)>> {
    match (hour, minute) {
        (Some(hour), minute) => Ok(Some((hour, minute.unwrap_or(0)))),
        (None, Some(minute)) => Err(ConfigError::MinuteWithoutHour(minute)),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_setter_keeps_previous_value() {
        let mut config = MarketHoursConfig::default();
        assert_eq!(config.set_market_open(25, 0), Err(ConfigError::HourOutOfRange(25)));
        assert_eq!(config.open().to_string(), "05:00");

        config.set_market_open(8, 30).unwrap();
        assert_eq!(config.open().minutes(), 510);
    }

    #[test]
    fn deserializes_partial_camel_case_object() {
        let config: MarketHoursConfig =
            serde_json::from_str(r#"{"weekendClose":{"hour":3,"minute":15}}"#).unwrap();
        assert_eq!(config.open().to_string(), "05:00");
        assert_eq!(config.weekend_close().to_string(), "03:15");
        assert_eq!(config.weekday_close(), None);
    }

    #[test]
    fn deserialization_validates_ranges() {
        let result = serde_json::from_str::<MarketHoursConfig>(r#"{"open":{"hour":24,"minute":0}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn weekday_close_needs_an_hour() {
        assert_eq!(weekday_close_parts(Some(17), Some(30)), Ok(Some((17, 30))));
        assert_eq!(weekday_close_parts(Some(17), None), Ok(Some((17, 0))));
        assert_eq!(weekday_close_parts(None, None), Ok(None));
        assert_eq!(weekday_close_parts(None, Some(30)), Err(ConfigError::MinuteWithoutHour(30)));
    }
}
