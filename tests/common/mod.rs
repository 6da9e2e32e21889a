#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use market_blur_wasm::application::{BlurSink, Clock, TickScheduler};
use market_blur_wasm::domain::market_hours::REFERENCE_TIMEZONE;
use market_blur_wasm::domain::visibility::{BlurTarget, TargetLocator};

pub const HOLIDAYS: &str = r#"{
    "holidays": {
        "2025": {
            "01-01": { "name": "วันขึ้นปีใหม่", "name_en": "New Year's Day", "type": "statutory" },
            "04-14": { "name": "วันสงกรานต์", "type": "statutory" }
        }
    }
}"#;

pub fn bangkok(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    REFERENCE_TIMEZONE.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().with_timezone(&Utc)
}

pub struct FixedClock(Cell<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Rc<Self> {
        Rc::new(Self(Cell::new(now)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.0.set(now);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

/// Marker set as `(locator, class)` pairs plus a count of sink calls.
#[derive(Default)]
pub struct RecordingSink {
    markers: RefCell<BTreeSet<(String, String)>>,
    calls: Cell<usize>,
}

impl RecordingSink {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn marker_count(&self) -> usize {
        self.markers.borrow().len()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn has(&self, id: &str, class: &str) -> bool {
        self.markers.borrow().contains(&(id.to_string(), class.to_string()))
    }

    fn key(target: &BlurTarget) -> String {
        match &target.locator {
            TargetLocator::ElementId(id) => id.clone(),
            TargetLocator::Selector(selector) => selector.clone(),
        }
    }
}

impl BlurSink for RecordingSink {
    fn add_markers(&self, target: &BlurTarget) {
        self.calls.set(self.calls.get() + 1);
        let mut markers = self.markers.borrow_mut();
        for class in &target.classes {
            markers.insert((Self::key(target), class.clone()));
        }
    }

    fn remove_markers(&self, target: &BlurTarget) {
        self.calls.set(self.calls.get() + 1);
        let mut markers = self.markers.borrow_mut();
        for class in &target.classes {
            markers.remove(&(Self::key(target), class.clone()));
        }
    }
}

type TickSlot = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

/// Keeps the scheduled closure so tests can fire ticks by hand.
#[derive(Default, Clone)]
pub struct ManualScheduler {
    slot: TickSlot,
    scheduled: Rc<Cell<usize>>,
    cancelled: Rc<Cell<usize>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when nothing is scheduled.
    pub fn fire(&self) -> bool {
        match self.slot.borrow_mut().as_mut() {
            Some(tick) => {
                tick();
                true
            }
            None => false,
        }
    }

    pub fn scheduled(&self) -> usize {
        self.scheduled.get()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.get()
    }

    pub fn period_is_active(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, _period: Duration, tick: Box<dyn FnMut()>) {
        self.scheduled.set(self.scheduled.get() + 1);
        *self.slot.borrow_mut() = Some(tick);
    }

    fn cancel(&mut self) {
        self.cancelled.set(self.cancelled.get() + 1);
        *self.slot.borrow_mut() = None;
    }
}
