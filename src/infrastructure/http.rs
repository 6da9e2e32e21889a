pub mod calendar_client;

pub use calendar_client::HttpCalendarSource;
