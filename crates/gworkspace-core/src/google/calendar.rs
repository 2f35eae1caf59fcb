//! Google Calendar API v3 Client
//!
//! Provides methods for interacting with Google Calendar API:
//! - List calendars
//! - List events in a time window
//! - Create events

use super::client::GoogleClient;
use super::common::{extract_array, path_segment};
use crate::common::AppResult;
use serde_json::{json, Value};
use tracing::{debug, info};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

pub struct CalendarApi {
    client: GoogleClient,
    base_url: String,
}

super::google_api_wrapper!(CalendarApi, CALENDAR_API_BASE);

impl CalendarApi {
    /// List all calendars for the authenticated user
    ///
    /// # Returns
    /// Array of calendar objects with id, summary, description, timeZone
    pub async fn list_calendars(&self) -> AppResult<Vec<Value>> {
        info!("Listing Google calendars");

        let url = format!("{}/users/me/calendarList", self.base_url);
        let response = self.client.get(&url, &[]).await?;

        let calendars = extract_array(&response, "items");

        debug!("Retrieved {} calendars", calendars.len());
        Ok(calendars)
    }

    /// List events in a calendar
    ///
    /// # Arguments
    /// * `calendar_id` - Calendar ID (use "primary" for user's primary calendar)
    /// * `time_min` - Lower bound (RFC3339 timestamp, e.g., "2026-02-08T00:00:00Z")
    /// * `time_max` - Upper bound (RFC3339 timestamp)
    /// * `max_results` - Maximum number of events to return
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: &str,
        time_max: Option<&str>,
        max_results: u32,
    ) -> AppResult<Vec<Value>> {
        info!("Listing events for calendar: {}", calendar_id);

        let mut query_params = vec![
            ("timeMin", time_min.to_string()),
            ("maxResults", max_results.to_string()),
            // Order by start time
            ("orderBy", "startTime".to_string()),
            ("singleEvents", "true".to_string()),
        ];

        if let Some(max) = time_max {
            query_params.push(("timeMax", max.to_string()));
        }

        let url = format!("{}/calendars/{}/events", self.base_url, path_segment(calendar_id));
        let response = self.client.get(&url, &query_params).await?;

        let events = extract_array(&response, "items");
        debug!("Retrieved {} events", events.len());
        Ok(events)
    }

    /// Create a new event
    ///
    /// # Arguments
    /// * `start` / `end` - RFC3339 timestamp or date-only YYYY-MM-DD
    pub async fn create_event(
        &self,
        calendar_id: &str,
        summary: &str,
        start: &str,
        end: &str,
        location: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<Value> {
        info!("Creating event: {} in calendar: {}", summary, calendar_id);

        let mut event = json!({
            "summary": summary,
            "start": event_time(start),
            "end": event_time(end),
        });

        if let Some(loc) = location {
            event["location"] = json!(loc);
        }

        if let Some(desc) = description {
            event["description"] = json!(desc);
        }

        let url = format!("{}/calendars/{}/events", self.base_url, path_segment(calendar_id));
        let response = self.client.post(&url, &[], &event).await?;

        info!("Event created successfully");
        Ok(response)
    }
}

/// Google Calendar start/end object: all-day for `YYYY-MM-DD`, timed otherwise
fn event_time(dt: &str) -> Value {
    if dt.len() == 10 && !dt.contains('T') {
        json!({ "date": dt })
    } else {
        json!({ "dateTime": dt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_time_with_timestamp() {
        let result = event_time("2026-02-08T15:00:00Z");
        assert_eq!(result, json!({"dateTime": "2026-02-08T15:00:00Z"}));
    }

    #[test]
    fn test_event_time_with_date_only() {
        let result = event_time("2026-02-08");
        assert_eq!(result, json!({"date": "2026-02-08"}));
    }
}
