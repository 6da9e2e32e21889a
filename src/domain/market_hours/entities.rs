use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

use super::value_objects::MonthDay;
use crate::domain::errors::{LoadError, LoadResult};

/// Holiday category as carried by the calendar document's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HolidayCategory {
    Statutory,
    #[default]
    Custom,
    #[serde(other)]
    Other,
}

/// One closed day in the exception calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(rename = "type", default)]
    pub category: HolidayCategory,
}

impl CalendarEntry {
    pub fn new(name: impl Into<String>, category: HolidayCategory) -> Self {
        Self { name: name.into(), name_en: None, category }
    }

    pub fn with_name_en(mut self, name_en: impl Into<String>) -> Self {
        self.name_en = Some(name_en.into());
        self
    }

    /// Name shown in reasons and reports: the English name when present.
    pub fn display_name(&self) -> &str {
        self.name_en.as_deref().unwrap_or(&self.name)
    }
}

/// Entries of a single year, ordered by month-day.
pub type YearCalendar = BTreeMap<MonthDay, CalendarEntry>;

/// year -> month-day -> entry
pub type Calendar = BTreeMap<i32, YearCalendar>;

/// Wire shape: `{ "holidays": { "2025": { "01-01": { "name": .., "name_en": .., "type": .. } } } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarDocument {
    #[serde(default)]
    pub holidays: Calendar,
}

impl CalendarDocument {
    pub fn from_json(text: &str) -> LoadResult<Self> {
        serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
    }

    pub fn entry_count(&self) -> usize {
        self.holidays.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "holidays": {
            "2025": {
                "04-14": { "name": "วันสงกรานต์", "name_en": "Songkran Festival", "type": "statutory" },
                "01-01": { "name": "วันขึ้นปีใหม่", "type": "statutory" },
                "05-05": { "name": "Shop closed", "type": "bridge" }
            }
        }
    }"#;

    #[test]
    fn parses_calendar_document() {
        let doc = CalendarDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.entry_count(), 3);

        let year = &doc.holidays[&2025];
        let keys: Vec<String> = year.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["01-01", "04-14", "05-05"]);

        let songkran = &year[&"04-14".parse().unwrap()];
        assert_eq!(songkran.display_name(), "Songkran Festival");
        assert_eq!(songkran.category, HolidayCategory::Statutory);

        let closed = &year[&"05-05".parse().unwrap()];
        assert_eq!(closed.category, HolidayCategory::Other);
        assert_eq!(closed.display_name(), "Shop closed");
    }

    #[test]
    fn malformed_month_day_key_rejects_document() {
        let result = CalendarDocument::from_json(r#"{"holidays":{"2025":{"1-1":{"name":"x","type":"custom"}}}}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn missing_holidays_key_is_empty_calendar() {
        let doc = CalendarDocument::from_json("{}").unwrap();
        assert_eq!(doc.entry_count(), 0);
    }
}
