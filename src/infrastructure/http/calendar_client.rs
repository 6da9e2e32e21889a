use gloo_net::http::Request;

use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_hours::{CalendarDocument, CalendarSource};
use crate::log_debug;

/// Fetches the holiday calendar document over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCalendarSource {
    url: String,
}

impl HttpCalendarSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Non-2xx responses become [`LoadError::Status`].
pub fn check_status(ok: bool, status: u16, status_text: &str) -> LoadResult<()> {
    if ok {
        Ok(())
    } else {
        Err(LoadError::Status { code: status, text: status_text.to_string() })
    }
}

impl CalendarSource for HttpCalendarSource {
    async fn fetch(&self) -> LoadResult<CalendarDocument> {
        log_debug!(LogComponent::Infrastructure("CalendarHTTP"), "GET {}", self.url);

        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        check_status(response.ok(), response.status(), &response.status_text())?;

        let body = response.text().await.map_err(|e| LoadError::Network(e.to_string()))?;
        CalendarDocument::from_json(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
