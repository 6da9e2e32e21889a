/// Failure to obtain the holiday calendar. Always recovered locally:
/// the store falls back to an empty calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Network(String),
    Status { code: u16, text: String },
    Parse(String),
}

/// Rejected configuration input. The previous configuration stays in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    HourOutOfRange(u32),
    MinuteOutOfRange(u32),
    MinuteWithoutHour(u32),
    InvalidMonthDay(String),
    UnknownTimezone(String),
    InvalidSettings(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "Network Error: {}", msg),
            LoadError::Status { code, text } => write!(f, "HTTP error: {} - {}", code, text),
            LoadError::Parse(msg) => write!(f, "Malformed calendar: {}", msg),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::HourOutOfRange(hour) => write!(f, "Hour {} is outside valid range [0, 23]", hour),
            ConfigError::MinuteOutOfRange(minute) => write!(f, "Minute {} is outside valid range [0, 59]", minute),
            ConfigError::MinuteWithoutHour(minute) => write!(f, "Minute {} given without an hour", minute),
            ConfigError::InvalidMonthDay(value) => write!(f, "Invalid month-day: {}", value),
            ConfigError::UnknownTimezone(name) => write!(f, "Unknown timezone: {}", name),
            ConfigError::InvalidSettings(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}
impl std::error::Error for ConfigError {}

pub type LoadResult<T> = Result<T, LoadError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
