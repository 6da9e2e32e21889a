use crate::application::{
    reconciliation::{BlurSink, Clock, ReconciliationLoop, Reconciler, TickScheduler},
    status::{HolidayListing, StatusSnapshot},
};
use crate::domain::{
    errors::{ConfigResult, LoadResult},
    logging::LogComponent,
    market_hours::{
        AvailabilityState, CalendarEntry, CalendarSource, CalendarStore, HolidayCategory, MarketHoursConfig,
        MonthDay, Verdict,
    },
};
use crate::settings::BlurSettings;
use crate::{log_info, log_warn};

/// Host-owned facade over one reconciliation loop and its calendar.
///
/// Every public operation is a thin delegation; configuration and calendar
/// edits re-evaluate immediately while the loop is running.
pub struct MarketBlurController<S, C, T> {
    reconciliation: ReconciliationLoop<S, C, T>,
    calendar: CalendarStore,
    stop_requested: bool,
}

impl<S, C, T> MarketBlurController<S, C, T>
where
    S: BlurSink + 'static,
    C: Clock + 'static,
    T: TickScheduler,
{
    pub fn new(settings: &BlurSettings, sink: S, clock: C, scheduler: T) -> ConfigResult<Self> {
        let engine = settings.validate()?;
        let calendar = CalendarStore::new();
        let reconciler = Reconciler::new(
            engine,
            settings.market_hours,
            calendar.clone(),
            settings.targets.clone(),
            sink,
            clock,
        );

        log_info!(
            LogComponent::Application("Controller"),
            "Market hours in {}: open {}, weekend close Saturday {}",
            settings.timezone,
            settings.market_hours.open(),
            settings.market_hours.weekend_close()
        );

        Ok(Self {
            reconciliation: ReconciliationLoop::new(reconciler, scheduler, settings.check_interval()),
            calendar,
            stop_requested: false,
        })
    }

    pub fn start(&mut self) -> bool {
        self.stop_requested = false;
        self.reconciliation.start()
    }

    /// Start queued by page startup. Skipped when the host called `stop()`
    /// while startup was still waiting; only an explicit `start()` resumes.
    pub fn start_deferred(&mut self) -> bool {
        if self.stop_requested {
            log_info!(LogComponent::Application("Controller"), "Stopped during startup, not starting");
            return false;
        }
        self.reconciliation.start()
    }

    /// Returns whether a running loop was stopped. Always blocks a pending
    /// [`start_deferred`](Self::start_deferred).
    pub fn stop(&mut self) -> bool {
        self.stop_requested = true;
        self.reconciliation.stop()
    }

    pub fn is_running(&self) -> bool {
        self.reconciliation.is_running()
    }

    /// Tick now while running; once stopped only reports, leaving the page untouched.
    pub fn check_now(&self) -> Verdict {
        if self.reconciliation.is_running() {
            self.reconciliation.tick()
        } else {
            self.reconciliation.with_reconciler(|reconciler| reconciler.evaluate())
        }
    }

    /// Last recorded state; `None` before the first tick or after stop.
    pub fn state(&self) -> Option<AvailabilityState> {
        self.reconciliation.with_reconciler(|reconciler| reconciler.state())
    }

    pub fn reason(&self) -> Option<String> {
        self.reconciliation
            .with_reconciler(|reconciler| reconciler.last_verdict().map(|verdict| verdict.reason.to_string()))
    }

    pub fn is_blurred(&self) -> bool {
        self.reconciliation.with_reconciler(|reconciler| reconciler.is_blurred())
    }

    pub fn market_hours(&self) -> MarketHoursConfig {
        self.reconciliation.with_reconciler(|reconciler| *reconciler.config())
    }

    pub fn set_market_open(&self, hour: u32, minute: u32) -> ConfigResult<Verdict> {
        self.reconciliation
            .with_reconciler_mut(|reconciler| reconciler.config_mut().set_market_open(hour, minute))?;
        log_info!(LogComponent::Application("Controller"), "Market open set to {:02}:{:02}", hour, minute);
        Ok(self.check_now())
    }

    pub fn set_weekend_close(&self, hour: u32, minute: u32) -> ConfigResult<Verdict> {
        self.reconciliation
            .with_reconciler_mut(|reconciler| reconciler.config_mut().set_weekend_close(hour, minute))?;
        log_info!(LogComponent::Application("Controller"), "Weekend close set to Saturday {:02}:{:02}", hour, minute);
        Ok(self.check_now())
    }

    /// `None` removes the weekday close gate.
    pub fn set_weekday_close(&self, close: Option<(u32, u32)>) -> ConfigResult<Verdict> {
        self.reconciliation
            .with_reconciler_mut(|reconciler| reconciler.config_mut().set_weekday_close(close))?;
        log_info!(
            LogComponent::Application("Controller"),
            "Weekday close set to {}",
            self.market_hours().weekday_close().map(|close| close.to_string()).unwrap_or_else(|| "none".to_string())
        );
        Ok(self.check_now())
    }

    /// Shared handle; loads through it are visible to the loop.
    pub fn calendar(&self) -> CalendarStore {
        self.calendar.clone()
    }

    /// Load the holiday calendar and re-evaluate. Failures leave an empty
    /// calendar in place and are returned only as a warning.
    pub async fn load_calendar<Src: CalendarSource>(&self, source: &Src) -> LoadResult<usize> {
        let result = self.calendar.load(source).await;
        self.check_now();
        result
    }

    pub fn add_holiday(
        &self,
        year: i32,
        month: u32,
        day: u32,
        name: &str,
        name_en: Option<&str>,
    ) -> ConfigResult<bool> {
        let month_day = MonthDay::new(month, day)?;
        let mut entry = CalendarEntry::new(name, HolidayCategory::Custom);
        if let Some(name_en) = name_en {
            entry = entry.with_name_en(name_en);
        }
        let added = self.calendar.add(year, month_day, entry);
        if added {
            self.check_now();
        }
        Ok(added)
    }

    pub fn remove_holiday(&self, year: i32, month: u32, day: u32) -> ConfigResult<bool> {
        let month_day = MonthDay::new(month, day)?;
        let removed = self.calendar.remove(year, month_day);
        if removed {
            self.check_now();
        } else {
            log_warn!(LogComponent::Application("Controller"), "No holiday on {}-{} to remove", year, month_day);
        }
        Ok(removed)
    }

    pub fn list_holidays(&self, year: i32) -> Vec<HolidayListing> {
        self.calendar.list(year).into_iter().map(HolidayListing::from).collect()
    }

    /// Fresh evaluation plus configuration, without side effects.
    pub fn status_snapshot(&self) -> StatusSnapshot {
        self.reconciliation.with_reconciler(|reconciler| {
            StatusSnapshot::describe(
                &reconciler.evaluate(),
                reconciler.engine().timezone().name(),
                self.reconciliation.period(),
                reconciler.config(),
                self.reconciliation.is_running(),
                reconciler.is_blurred(),
                self.calendar.is_initialized(),
                self.calendar.len(),
            )
        })
    }
}
