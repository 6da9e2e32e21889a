use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate};

use super::entities::{Calendar, CalendarDocument, CalendarEntry};
use super::value_objects::MonthDay;
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_info, log_warn};

/// Where the exception calendar comes from (HTTP, inline JSON, tests).
#[allow(async_fn_in_trait)]
pub trait CalendarSource {
    async fn fetch(&self) -> LoadResult<CalendarDocument>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// Shared handle to the holiday calendar.
///
/// `None` until the first load attempt finishes. Clones share the same
/// calendar, so the reconciliation loop sees loads and edits immediately.
#[derive(Debug, Clone, Default)]
pub struct CalendarStore {
    calendar: Rc<RefCell<Option<Calendar>>>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that is already initialized with `calendar`.
    pub fn with_calendar(calendar: Calendar) -> Self {
        let store = Self::new();
        store.replace(calendar);
        store
    }

    pub fn is_initialized(&self) -> bool {
        self.calendar.borrow().is_some()
    }

    /// Fetch and install a calendar. A failed fetch installs an empty calendar
    /// and hands the error back as a warning; the store is initialized either way.
    pub async fn load<S: CalendarSource>(&self, source: &S) -> LoadResult<usize> {
        log_debug!(LogComponent::Domain("Calendar"), "Loading holidays from {}", source.describe());

        match source.fetch().await {
            Ok(document) => {
                let count = document.entry_count();
                self.replace(document.holidays);
                log_info!(LogComponent::Domain("Calendar"), "Loaded {} holidays", count);
                Ok(count)
            }
            Err(error) => {
                self.replace(Calendar::new());
                log_warn!(
                    LogComponent::Domain("Calendar"),
                    "Holiday data unavailable ({}), falling back to weekend-only rules",
                    error
                );
                Err(error)
            }
        }
    }

    /// Swap in a whole calendar at once.
    pub fn replace(&self, calendar: Calendar) {
        *self.calendar.borrow_mut() = Some(calendar);
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<CalendarEntry> {
        self.calendar
            .borrow()
            .as_ref()
            .and_then(|calendar| calendar.get(&date.year()))
            .and_then(|year| year.get(&MonthDay::of(date)))
            .cloned()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.entry_for(date).is_some()
    }

    /// Insert or overwrite. `false` only when no load has completed yet.
    pub fn add(&self, year: i32, month_day: MonthDay, entry: CalendarEntry) -> bool {
        let mut guard = self.calendar.borrow_mut();
        let Some(calendar) = guard.as_mut() else {
            log_warn!(LogComponent::Domain("Calendar"), "Cannot add {}-{}: calendar not loaded yet", year, month_day);
            return false;
        };
        log_info!(LogComponent::Domain("Calendar"), "Added holiday {}-{}: {}", year, month_day, entry.display_name());
        calendar.entry(year).or_default().insert(month_day, entry);
        true
    }

    /// Returns whether an entry existed.
    pub fn remove(&self, year: i32, month_day: MonthDay) -> bool {
        let mut guard = self.calendar.borrow_mut();
        let Some(calendar) = guard.as_mut() else {
            return false;
        };
        let removed = calendar
            .get_mut(&year)
            .and_then(|entries| entries.remove(&month_day))
            .is_some();
        if calendar.get(&year).is_some_and(|entries| entries.is_empty()) {
            calendar.remove(&year);
        }
        if removed {
            log_info!(LogComponent::Domain("Calendar"), "Removed holiday {}-{}", year, month_day);
        }
        removed
    }

    /// Entries of `year`, ascending by month-day.
    pub fn list(&self, year: i32) -> Vec<(MonthDay, CalendarEntry)> {
        self.calendar
            .borrow()
            .as_ref()
            .and_then(|calendar| calendar.get(&year))
            .map(|entries| entries.iter().map(|(key, entry)| (*key, entry.clone())).collect())
            .unwrap_or_default()
    }

    /// Total number of entries across all years.
    pub fn len(&self) -> usize {
        self.calendar
            .borrow()
            .as_ref()
            .map(|calendar| calendar.values().map(|entries| entries.len()).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source that always answers with the same result. Handy for inline
/// calendars and for exercising the fallback path.
#[derive(Debug, Clone)]
pub struct StaticCalendarSource {
    result: LoadResult<CalendarDocument>,
}

impl StaticCalendarSource {
    pub fn document(document: CalendarDocument) -> Self {
        Self { result: Ok(document) }
    }

    pub fn failing(error: LoadError) -> Self {
        Self { result: Err(error) }
    }

    pub fn json(text: &str) -> Self {
        Self { result: CalendarDocument::from_json(text) }
    }
}

impl CalendarSource for StaticCalendarSource {
    async fn fetch(&self) -> LoadResult<CalendarDocument> {
        self.result.clone()
    }

    fn describe(&self) -> String {
        "inline calendar".to_string()
    }
}
