use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::{ConfigError, ConfigResult},
    logging::LogLevel,
    market_hours::{AvailabilityEngine, MarketHoursConfig},
    visibility::TargetElementSet,
};

pub const DEFAULT_TIMEZONE: &str = "Asia/Bangkok";
pub const DEFAULT_CHECK_INTERVAL_MS: u32 = 30_000;
pub const DEFAULT_STARTUP_DELAY_MS: u32 = 1_000;
pub const DEFAULT_CALENDAR_URL: &str = "config/holidays.json";

/// Host-supplied configuration. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlurSettings {
    /// IANA zone all market rules are evaluated in.
    pub timezone: String,
    pub market_hours: MarketHoursConfig,
    pub check_interval_ms: u32,
    /// Grace period after DOM ready so the quote widgets can render first.
    pub startup_delay_ms: u32,
    /// `None` runs on weekend-only rules.
    pub calendar_url: Option<String>,
    pub targets: TargetElementSet,
    pub log_level: LogLevel,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            market_hours: MarketHoursConfig::default(),
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
            calendar_url: Some(DEFAULT_CALENDAR_URL.to_string()),
            targets: TargetElementSet::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl BlurSettings {
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
    }

    /// Checks cross-field constraints and resolves the timezone.
    pub fn validate(&self) -> ConfigResult<AvailabilityEngine> {
        if self.check_interval_ms == 0 {
            return Err(ConfigError::InvalidSettings("checkIntervalMs must be positive".to_string()));
        }
        if self.targets.is_empty() {
            return Err(ConfigError::InvalidSettings("targets must not be empty".to_string()));
        }
        AvailabilityEngine::for_timezone(&self.timezone)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.check_interval_ms))
    }

    pub fn calendar_url(&self) -> Option<&str> {
        self.calendar_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let settings = BlurSettings::default();
        assert_eq!(settings.check_interval(), Duration::from_secs(30));
        assert_eq!(settings.calendar_url(), Some("config/holidays.json"));
        assert_eq!(settings.targets.len(), 9);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let settings = BlurSettings::from_json(
            r#"{"checkIntervalMs": 5000, "calendarUrl": null, "marketHours": {"open": {"hour": 8, "minute": 30}}}"#,
        )
        .unwrap();
        assert_eq!(settings.check_interval_ms, 5000);
        assert_eq!(settings.calendar_url(), None);
        assert_eq!(settings.market_hours.open().to_string(), "08:30");
        assert_eq!(settings.market_hours.weekend_close().to_string(), "04:00");
        assert_eq!(settings.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let zero = BlurSettings { check_interval_ms: 0, ..BlurSettings::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidSettings(_))));

        let unknown = BlurSettings { timezone: "Nowhere/Town".to_string(), ..BlurSettings::default() };
        assert_eq!(unknown.validate(), Err(ConfigError::UnknownTimezone("Nowhere/Town".to_string())));

        assert!(BlurSettings::from_json(r#"{"marketHours":{"open":{"hour":30,"minute":0}}}"#).is_err());
    }
}
