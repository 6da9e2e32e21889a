use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use gloo::events::EventListener;
use gloo::utils::{document, format::JsValueSerdeExt};
use gloo_timers::future::TimeoutFuture;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::controller::MarketBlurController;
use crate::domain::{
    logging::{LogComponent, init_logger},
    market_hours::{Calendar, CalendarStore, weekday_close_parts},
};
use crate::infrastructure::{BrowserClock, ConsoleLogger, DomBlurSink, HttpCalendarSource, IntervalScheduler};
use crate::settings::BlurSettings;
use crate::{log_info, log_warn};

type BrowserController = MarketBlurController<DomBlurSink, BrowserClock, IntervalScheduler>;

fn to_js<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// JavaScript handle for the price blur on a quote page.
#[wasm_bindgen]
pub struct MarketBlurApi {
    controller: Rc<RefCell<BrowserController>>,
    settings: BlurSettings,
}

#[wasm_bindgen]
impl MarketBlurApi {
    /// `config` is a plain object; `undefined` or `null` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<MarketBlurApi, JsValue> {
        let settings: BlurSettings = if config.is_undefined() || config.is_null() {
            BlurSettings::default()
        } else {
            config.into_serde().map_err(to_js)?
        };

        init_logger(Box::new(ConsoleLogger::new(settings.log_level)));

        let controller =
            MarketBlurController::new(&settings, DomBlurSink::new(), BrowserClock, IntervalScheduler::new())
                .map_err(to_js)?;

        log_info!(LogComponent::Presentation("MarketBlurApi"), "Market blur created");

        Ok(Self { controller: Rc::new(RefCell::new(controller)), settings })
    }

    /// Wait for the page, start checking and load the holiday calendar.
    /// Resolves with the state after the first full check.
    #[wasm_bindgen(js_name = init)]
    pub fn init(&self) -> Promise {
        let controller = Rc::clone(&self.controller);
        let settings = self.settings.clone();

        future_to_promise(async move {
            dom_ready().await;
            TimeoutFuture::new(settings.startup_delay_ms).await;

            controller.borrow_mut().start_deferred();

            let calendar = controller.borrow().calendar();
            load_into(&calendar, settings.calendar_url()).await;

            let verdict = controller.borrow().check_now();
            Ok(JsValue::from_str(&verdict.state.to_string()))
        })
    }

    pub fn start(&self) -> bool {
        self.controller.borrow_mut().start()
    }

    pub fn stop(&self) -> bool {
        self.controller.borrow_mut().stop()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.controller.borrow().is_running()
    }

    /// Force an immediate check; returns `"OPEN"` or `"CLOSED"`.
    #[wasm_bindgen(js_name = checkStatus)]
    pub fn check_status(&self) -> String {
        self.controller.borrow().check_now().state.to_string()
    }

    /// Last recorded state, `undefined` before the first check.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Option<String> {
        self.controller.borrow().state().map(|state| state.to_string())
    }

    #[wasm_bindgen(js_name = getReason)]
    pub fn get_reason(&self) -> Option<String> {
        self.controller.borrow().reason()
    }

    #[wasm_bindgen(js_name = isBlurred)]
    pub fn is_blurred(&self) -> bool {
        self.controller.borrow().is_blurred()
    }

    #[wasm_bindgen(js_name = setMarketOpen)]
    pub fn set_market_open(&self, hour: u32, minute: u32) -> Result<String, JsValue> {
        let verdict = self.controller.borrow().set_market_open(hour, minute).map_err(to_js)?;
        Ok(verdict.state.to_string())
    }

    #[wasm_bindgen(js_name = setWeekendClose)]
    pub fn set_weekend_close(&self, hour: u32, minute: u32) -> Result<String, JsValue> {
        let verdict = self.controller.borrow().set_weekend_close(hour, minute).map_err(to_js)?;
        Ok(verdict.state.to_string())
    }

    /// Omit both arguments to drop the weekday close.
    #[wasm_bindgen(js_name = setWeekdayClose)]
    pub fn set_weekday_close(&self, hour: Option<u32>, minute: Option<u32>) -> Result<String, JsValue> {
        let close = weekday_close_parts(hour, minute).map_err(to_js)?;
        let verdict = self.controller.borrow().set_weekday_close(close).map_err(to_js)?;
        Ok(verdict.state.to_string())
    }

    #[wasm_bindgen(js_name = addHoliday)]
    pub fn add_holiday(
        &self,
        year: i32,
        month: u32,
        day: u32,
        name: String,
        name_en: Option<String>,
    ) -> Result<bool, JsValue> {
        self.controller
            .borrow()
            .add_holiday(year, month, day, &name, name_en.as_deref())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = removeHoliday)]
    pub fn remove_holiday(&self, year: i32, month: u32, day: u32) -> Result<bool, JsValue> {
        self.controller.borrow().remove_holiday(year, month, day).map_err(to_js)
    }

    /// Array of `{monthDay, name, nameEn?, category}` sorted by date.
    #[wasm_bindgen(js_name = listHolidays)]
    pub fn list_holidays(&self, year: i32) -> Result<JsValue, JsValue> {
        JsValue::from_serde(&self.controller.borrow().list_holidays(year)).map_err(to_js)
    }

    #[wasm_bindgen(js_name = statusReport)]
    pub fn status_report(&self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(&self.controller.borrow().status_snapshot()).map_err(to_js)
    }

    /// Fetch the calendar again; resolves with the number of holidays loaded.
    #[wasm_bindgen(js_name = reloadCalendar)]
    pub fn reload_calendar(&self) -> Promise {
        let controller = Rc::clone(&self.controller);
        let url = self.settings.calendar_url().map(str::to_string);

        future_to_promise(async move {
            let calendar = controller.borrow().calendar();
            load_into(&calendar, url.as_deref()).await;
            controller.borrow().check_now();
            Ok(JsValue::from(calendar.len() as u32))
        })
    }
}

/// Construct the blur with `config`, kick off `init()` and hand the object back.
#[wasm_bindgen(js_name = autoStart)]
pub fn auto_start(config: JsValue) -> Result<MarketBlurApi, JsValue> {
    let api = MarketBlurApi::new(config)?;
    let _ = api.init();
    Ok(api)
}

/// Holds the store borrow only between awaits. Failures are already logged
/// by the store and leave it empty.
async fn load_into(calendar: &CalendarStore, url: Option<&str>) {
    match url {
        Some(url) => {
            let _ = calendar.load(&HttpCalendarSource::new(url)).await;
        }
        None => {
            log_warn!(LogComponent::Presentation("MarketBlurApi"), "No calendar URL configured, weekend rules only");
            calendar.replace(Calendar::new());
        }
    }
}

async fn dom_ready() {
    let document = document();
    if document.ready_state() != "loading" {
        return;
    }

    let (sender, receiver) = oneshot::channel::<()>();
    let _listener = EventListener::once(&document, "DOMContentLoaded", move |_| {
        let _ = sender.send(());
    });
    let _ = receiver.await;
}
