use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{
    logging::{LogComponent, LogEntry, LogLevel, get_logger},
    market_hours::{AvailabilityEngine, AvailabilityState, CalendarStore, MarketHoursConfig, Verdict},
    visibility::{BlurTarget, TargetElementSet},
};
use crate::{log_debug, log_info, log_warn};

/// Source of "now".
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Page side effect: toggle marker classes on one target.
pub trait BlurSink {
    fn add_markers(&self, target: &BlurTarget);
    fn remove_markers(&self, target: &BlurTarget);
}

/// Recurring trigger for ticks. At most one schedule is active at a time.
pub trait TickScheduler {
    fn schedule(&mut self, period: Duration, tick: Box<dyn FnMut()>);
    fn cancel(&mut self);
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<S: BlurSink + ?Sized> BlurSink for Rc<S> {
    fn add_markers(&self, target: &BlurTarget) {
        (**self).add_markers(target)
    }

    fn remove_markers(&self, target: &BlurTarget) {
        (**self).remove_markers(target)
    }
}

/// One evaluation step: ask the engine, diff against the last verdict and
/// toggle the blur only when the state changes.
pub struct Reconciler<S, C> {
    engine: AvailabilityEngine,
    config: MarketHoursConfig,
    calendar: CalendarStore,
    targets: TargetElementSet,
    sink: S,
    clock: C,
    last: Option<Verdict>,
    blurred: bool,
}

impl<S: BlurSink, C: Clock> Reconciler<S, C> {
    pub fn new(
        engine: AvailabilityEngine,
        config: MarketHoursConfig,
        calendar: CalendarStore,
        targets: TargetElementSet,
        sink: S,
        clock: C,
    ) -> Self {
        Self { engine, config, calendar, targets, sink, clock, last: None, blurred: false }
    }

    /// Fresh verdict for the current clock time, without side effects.
    pub fn evaluate(&self) -> Verdict {
        self.engine.evaluate(self.clock.now(), &self.config, &self.calendar)
    }

    pub fn tick(&mut self) -> Verdict {
        let verdict = self.evaluate();
        let previous = self.last.as_ref().map(|last| last.state);

        log_debug!(
            LogComponent::Application("Reconciliation"),
            "{} time {}, price {}",
            self.engine.timezone(),
            verdict.at,
            verdict.state
        );

        if previous != Some(verdict.state) {
            let message = format!(
                "Market {} -> {}: {}",
                previous.map(|state| state.to_string()).unwrap_or_else(|| "UNKNOWN".to_string()),
                verdict.state,
                verdict.reason
            );
            get_logger().log(
                LogEntry::new(LogLevel::Info, LogComponent::Application("Reconciliation"), &message)
                    .with_metadata(format!("at {} {}", verdict.at, self.engine.timezone().name())),
            );
            match verdict.state {
                AvailabilityState::Closed => self.apply_blur(),
                AvailabilityState::Open => self.remove_blur(),
            };
        }

        self.last = Some(verdict.clone());
        verdict
    }

    /// Returns `false` when already blurred.
    pub fn apply_blur(&mut self) -> bool {
        if self.blurred {
            return false;
        }
        log_info!(LogComponent::Application("Reconciliation"), "Price not available - applying blur");
        for target in self.targets.iter() {
            self.sink.add_markers(target);
        }
        self.blurred = true;
        true
    }

    /// Returns `false` when nothing is blurred.
    pub fn remove_blur(&mut self) -> bool {
        if !self.blurred {
            return false;
        }
        log_info!(LogComponent::Application("Reconciliation"), "Price available - removing blur");
        for target in self.targets.iter() {
            self.sink.remove_markers(target);
        }
        self.blurred = false;
        true
    }

    /// Forget the recorded state so the next tick re-applies the side effect.
    pub fn forget(&mut self) {
        self.last = None;
    }

    pub fn state(&self) -> Option<AvailabilityState> {
        self.last.as_ref().map(|verdict| verdict.state)
    }

    pub fn last_verdict(&self) -> Option<&Verdict> {
        self.last.as_ref()
    }

    pub fn is_blurred(&self) -> bool {
        self.blurred
    }

    pub fn engine(&self) -> &AvailabilityEngine {
        &self.engine
    }

    pub fn config(&self) -> &MarketHoursConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MarketHoursConfig {
        &mut self.config
    }

    pub fn calendar(&self) -> &CalendarStore {
        &self.calendar
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Runs a [`Reconciler`] now and then every `period` until stopped.
pub struct ReconciliationLoop<S, C, T> {
    core: Rc<RefCell<Reconciler<S, C>>>,
    scheduler: T,
    period: Duration,
    running: bool,
}

impl<S, C, T> ReconciliationLoop<S, C, T>
where
    S: BlurSink + 'static,
    C: Clock + 'static,
    T: TickScheduler,
{
    pub fn new(reconciler: Reconciler<S, C>, scheduler: T, period: Duration) -> Self {
        Self { core: Rc::new(RefCell::new(reconciler)), scheduler, period, running: false }
    }

    /// Immediate tick, then recurring ticks. No-op while already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            log_debug!(LogComponent::Application("Reconciliation"), "Already running");
            return false;
        }

        self.core.borrow_mut().tick();

        let core = Rc::clone(&self.core);
        self.scheduler.schedule(
            self.period,
            Box::new(move || match core.try_borrow_mut() {
                Ok(mut reconciler) => {
                    reconciler.tick();
                }
                Err(_) => {
                    log_warn!(LogComponent::Application("Reconciliation"), "Previous check still in progress, tick skipped");
                }
            }),
        );
        self.running = true;

        log_info!(
            LogComponent::Application("Reconciliation"),
            "Started, checking every {} seconds",
            self.period.as_secs()
        );
        true
    }

    /// Cancel the recurrence and leave prices visible. No-op when stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.scheduler.cancel();
        self.running = false;

        let mut core = self.core.borrow_mut();
        core.remove_blur();
        core.forget();

        log_info!(LogComponent::Application("Reconciliation"), "Stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tick(&self) -> Verdict {
        self.core.borrow_mut().tick()
    }

    pub fn with_reconciler<R>(&self, f: impl FnOnce(&Reconciler<S, C>) -> R) -> R {
        f(&self.core.borrow())
    }

    pub fn with_reconciler_mut<R>(&self, f: impl FnOnce(&mut Reconciler<S, C>) -> R) -> R {
        f(&mut self.core.borrow_mut())
    }
}
