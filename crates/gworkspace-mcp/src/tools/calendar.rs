//! Calendar tools

use chrono::{SecondsFormat, Utc};
use gworkspace_core::google::{CalendarApi, GoogleClient};
use gworkspace_core::scopes::{self, CALENDAR_EVENTS_SCOPE, CALENDAR_READONLY_SCOPE};
use gworkspace_core::AppResult;
use serde_json::{json, Value};
use tracing::info;

use super::args::{count_with_default, optional_string, require_string, schema, string_with_default};
use super::{unknown_handler, ToolDef};

pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "list_calendars",
            group: scopes::CALENDAR,
            description: "Lists the calendars the account can see.",
            required_scopes: &[CALENDAR_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(json!({}), &[]),
        },
        ToolDef {
            name: "get_events",
            group: scopes::CALENDAR,
            description: "Lists upcoming events of a calendar ordered by start time. \
                          time_min defaults to now.",
            required_scopes: &[CALENDAR_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({
                    "calendar_id": {"type": "string", "default": "primary"},
                    "time_min": {"type": "string", "description": "RFC3339 lower bound."},
                    "time_max": {"type": "string", "description": "RFC3339 upper bound."},
                    "max_results": {"type": "integer", "default": 25}
                }),
                &[],
            ),
        },
        ToolDef {
            name: "create_event",
            group: scopes::CALENDAR,
            description: "Creates an event. start and end take an RFC3339 timestamp, \
                          or YYYY-MM-DD for an all-day event.",
            required_scopes: &[CALENDAR_EVENTS_SCOPE],
            read_only: false,
            input_schema: schema(
                json!({
                    "summary": {"type": "string"},
                    "start": {"type": "string"},
                    "end": {"type": "string"},
                    "calendar_id": {"type": "string", "default": "primary"},
                    "location": {"type": "string"},
                    "description": {"type": "string"}
                }),
                &["summary", "start", "end"],
            ),
        },
    ]
}

pub async fn call(name: &str, client: GoogleClient, account: &str, args: &Value) -> AppResult<String> {
    let calendar = CalendarApi::new(client);
    match name {
        "list_calendars" => {
            let calendars = calendar.list_calendars().await?;
            let lines: Vec<String> = calendars
                .iter()
                .map(|c| {
                    let primary = if c.get("primary").and_then(|v| v.as_bool()).unwrap_or(false) {
                        " [primary]"
                    } else {
                        ""
                    };
                    format!(
                        "- \"{}\" (ID: {}){}",
                        c.get("summary").and_then(|v| v.as_str()).unwrap_or("No Title"),
                        c.get("id").and_then(|v| v.as_str()).unwrap_or("N/A"),
                        primary
                    )
                })
                .collect();
            Ok(format!(
                "Found {} calendars for {}:\n{}",
                calendars.len(),
                account,
                lines.join("\n")
            ))
        }
        "get_events" => {
            let calendar_id = string_with_default(args, "calendar_id", "primary");
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            let time_min = optional_string(args, "time_min").unwrap_or(now.as_str());
            let time_max = optional_string(args, "time_max");
            let max_results = count_with_default(args, "max_results", 25, 250);

            let events = calendar
                .list_events(calendar_id, time_min, time_max, max_results)
                .await?;
            if events.is_empty() {
                return Ok(format!(
                    "No events found in calendar '{}' for {} from {}.",
                    calendar_id, account, time_min
                ));
            }

            let lines: Vec<String> = events.iter().map(format_event).collect();
            Ok(format!(
                "Found {} events in calendar '{}' for {}:\n{}",
                events.len(),
                calendar_id,
                account,
                lines.join("\n")
            ))
        }
        "create_event" => {
            let summary = require_string(args, "summary")?;
            let start = require_string(args, "start")?;
            let end = require_string(args, "end")?;
            let calendar_id = string_with_default(args, "calendar_id", "primary");
            info!("[create_event] Email: '{}', Summary: '{}'", account, summary);

            let created = calendar
                .create_event(
                    calendar_id,
                    summary,
                    start,
                    end,
                    optional_string(args, "location"),
                    optional_string(args, "description"),
                )
                .await?;

            Ok(format!(
                "Successfully created event for {}:\n{}",
                account,
                format_event(&created)
            ))
        }
        _ => Err(unknown_handler(scopes::CALENDAR, name)),
    }
}

fn format_event(event: &Value) -> String {
    let time = |key: &str| {
        event
            .get(key)
            .and_then(|t| t.get("dateTime").or_else(|| t.get("date")))
            .and_then(|v| v.as_str())
            .unwrap_or("N/A")
    };

    let mut line = format!(
        "- \"{}\" (Starts: {}, Ends: {}) ID: {}",
        event.get("summary").and_then(|v| v.as_str()).unwrap_or("No Title"),
        time("start"),
        time("end"),
        event.get("id").and_then(|v| v.as_str()).unwrap_or("N/A"),
    );
    if let Some(link) = event.get("htmlLink").and_then(|v| v.as_str()) {
        line.push_str(&format!("\n  Link: {}", link));
    }
    line
}
