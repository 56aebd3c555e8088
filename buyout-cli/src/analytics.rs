//! Local analytics event tracking.
//!
//! Events are recorded in memory and written to the log. Nothing leaves the
//! process. The calculation engine never sees these events; the session
//! layer emits them at the moments a user would notice something change.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::debug;

/// Named user interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventType {
    /// First change to any field. Recorded once until the log is cleared.
    InputStarted,
    BuyoutEntered,
    ProvinceSelected,
    AdvancedOpened,
    AdvancedClosed,
    /// Results became valid and visible.
    ResultViewed,
    CtaClicked,
    ValueToggleChanged,
    VehicleValueEntered,
    SummaryCopied,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputStarted => "input_started",
            Self::BuyoutEntered => "buyout_entered",
            Self::ProvinceSelected => "province_selected",
            Self::AdvancedOpened => "advanced_opened",
            Self::AdvancedClosed => "advanced_closed",
            Self::ResultViewed => "result_viewed",
            Self::CtaClicked => "cta_clicked",
            Self::ValueToggleChanged => "value_toggle_changed",
            Self::VehicleValueEntered => "vehicle_value_entered",
            Self::SummaryCopied => "summary_copied",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub id: u64,
    pub event_type: EventType,
    pub timestamp: DateTime<Local>,
    pub metadata: Option<Value>,
}

/// Fire-and-forget receiver of analytics events.
pub trait EventSink {
    fn track(
        &mut self,
        event_type: EventType,
        metadata: Option<Value>,
    );
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Vec<AnalyticsEvent>,
    next_id: u64,
    has_started_input: bool,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    /// Number of recorded events of each type.
    pub fn counts(&self) -> BTreeMap<EventType, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.event_type).or_insert(0) += 1;
        }
        counts
    }

    /// Drops all events and re-arms `input_started`.
    pub fn clear(&mut self) {
        self.events.clear();
        self.has_started_input = false;
    }
}

impl EventSink for InMemoryEventLog {
    fn track(
        &mut self,
        event_type: EventType,
        metadata: Option<Value>,
    ) {
        if event_type == EventType::InputStarted {
            if self.has_started_input {
                return;
            }
            self.has_started_input = true;
        }

        match &metadata {
            Some(metadata) => debug!(event = event_type.as_str(), %metadata, "analytics"),
            None => debug!(event = event_type.as_str(), "analytics"),
        }

        self.next_id += 1;
        self.events.push(AnalyticsEvent {
            id: self.next_id,
            event_type,
            timestamp: Local::now(),
            metadata,
        });
    }
}

/// Formats an event timestamp for display (`HH:MM:SS`).
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}
