//! Browser-backed implementations of the domain and application service traits.

use std::time::Duration;

use chrono::{DateTime, Utc};
use gloo_timers::callback::Interval;
use wasm_bindgen::JsValue;

use crate::application::reconciliation::{Clock, TickScheduler};
use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Writes entries at or above `min_level` to the browser console.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line: JsValue = entry.render(&BrowserTimeProvider.format_timestamp(entry.timestamp)).into();
        match entry.level {
            LogLevel::Debug => web_sys::console::debug_1(&line),
            LogLevel::Info => web_sys::console::info_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Error => web_sys::console::error_1(&line),
        }
    }
}

/// Milliseconds since the epoch from `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&(timestamp as f64).into());
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}

/// Wall clock of the viewer's browser. Timezone is irrelevant here; the
/// engine normalises to the reference zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

/// `setInterval`-backed scheduler. Dropping the handle clears the interval.
#[derive(Default)]
pub struct IntervalScheduler {
    interval: Option<Interval>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&mut self, period: Duration, mut tick: Box<dyn FnMut()>) {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        self.interval = Some(Interval::new(millis, move || tick()));
    }

    fn cancel(&mut self) {
        if let Some(interval) = self.interval.take() {
            interval.cancel();
        }
    }
}
