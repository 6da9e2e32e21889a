pub mod dom;
pub mod http;
pub mod services;

pub use dom::DomBlurSink;
pub use http::HttpCalendarSource;
pub use services::{BrowserClock, BrowserTimeProvider, ConsoleLogger, IntervalScheduler};
