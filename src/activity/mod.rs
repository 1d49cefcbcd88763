//! Fire-and-forget activity reporting.
//!
//! Screens report what the learner looked at or changed. Delivery failures are
//! logged and swallowed; they never reach the caller.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{FinanceError, FinanceResult};
use crate::profile::AgeGroup;

pub const PAGE_VIEW: &str = "page_view";
pub const CREDIT_PAGE: &str = "/student/finance/credit-management";
pub const DEBT_PAGE: &str = "/student/finance/debt-tracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub activity_type: String,
    pub description: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl ActivityEvent {
    pub fn new(activity_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            description: description.into(),
            metadata: Map::new(),
            page_url: None,
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn with_page(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    /// The event a screen sends when it is opened.
    pub fn page_view(
        description: impl Into<String>,
        page: &str,
        group: AgeGroup,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new(PAGE_VIEW, description)
            .with_meta("page", page)
            .with_meta("ageGroup", group.as_str())
            .with_meta("timestamp", at.to_rfc3339())
            .with_page(page)
    }
}

/// Acknowledgement returned by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityReceipt {
    pub id: Uuid,
}

impl ActivityReceipt {
    pub fn issue() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

pub trait ActivitySink: Send + Sync {
    fn log_activity(&self, event: &ActivityEvent) -> FinanceResult<ActivityReceipt>;
}

/// Emits every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ActivitySink for TracingSink {
    fn log_activity(&self, event: &ActivityEvent) -> FinanceResult<ActivityReceipt> {
        tracing::info!(
            target: "finwell_core::activity",
            activity_type = %event.activity_type,
            page = event.page_url.as_deref().unwrap_or(""),
            "{}",
            event.description
        );
        Ok(ActivityReceipt::issue())
    }
}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<ActivityEvent>,
    failing: bool,
}

/// Keeps events in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    inner: Arc<Mutex<Recorded>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the sink reject events, as an unreachable endpoint would.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn events(&self) -> Vec<ActivityEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ActivitySink for MemorySink {
    fn log_activity(&self, event: &ActivityEvent) -> FinanceResult<ActivityReceipt> {
        let mut recorded = self.lock();
        if recorded.failing {
            return Err(FinanceError::ExternalCall("activity endpoint unavailable".into()));
        }
        recorded.events.push(event.clone());
        Ok(ActivityReceipt::issue())
    }
}

pub struct ActivityLogger {
    sink: Box<dyn ActivitySink>,
}

impl ActivityLogger {
    pub fn new(sink: Box<dyn ActivitySink>) -> Self {
        Self { sink }
    }

    pub fn tracing() -> Self {
        Self::new(Box::new(TracingSink))
    }

    /// Sends the event and returns the receipt when delivery worked.
    pub fn log(&self, event: ActivityEvent) -> Option<ActivityReceipt> {
        match self.sink.log_activity(&event) {
            Ok(receipt) => Some(receipt),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    activity_type = %event.activity_type,
                    "activity not recorded"
                );
                None
            }
        }
    }
}

impl Default for ActivityLogger {
    fn default() -> Self {
        Self::tracing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_view_carries_page_and_age_group() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let event = ActivityEvent::page_view("Viewed debt tracker", DEBT_PAGE, AgeGroup::Teens, at);
        assert_eq!(event.activity_type, PAGE_VIEW);
        assert_eq!(event.page_url.as_deref(), Some(DEBT_PAGE));
        assert_eq!(event.metadata["ageGroup"], "teens");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["activityType"], "page_view");
        assert_eq!(json["pageUrl"], DEBT_PAGE);
    }

    #[test]
    fn failures_are_swallowed() {
        let sink = MemorySink::new();
        let logger = ActivityLogger::new(Box::new(sink.clone()));
        sink.set_failing(true);
        assert!(logger.log(ActivityEvent::new("credit_account_added", "Added")).is_none());
        assert!(sink.events().is_empty());

        sink.set_failing(false);
        assert!(logger.log(ActivityEvent::new("credit_account_added", "Added")).is_some());
        assert_eq!(sink.events().len(), 1);
    }
}
