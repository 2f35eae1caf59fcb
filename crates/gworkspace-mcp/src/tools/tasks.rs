//! Tasks tools

use gworkspace_core::google::{GoogleClient, TasksApi};
use gworkspace_core::scopes::{self, TASKS_READONLY_SCOPE, TASKS_SCOPE};
use gworkspace_core::AppResult;
use serde_json::{json, Value};
use tracing::info;

use super::args::{bool_with_default, count_with_default, optional_string, require_string, schema};
use super::{unknown_handler, ToolDef};

pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "list_task_lists",
            group: scopes::TASKS,
            description: "Lists the account's task lists with their IDs.",
            required_scopes: &[TASKS_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({"max_results": {"type": "integer", "default": 100}}),
                &[],
            ),
        },
        ToolDef {
            name: "list_tasks",
            group: scopes::TASKS,
            description: "Lists tasks in a task list.",
            required_scopes: &[TASKS_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({
                    "task_list_id": {"type": "string"},
                    "show_completed": {"type": "boolean", "default": true},
                    "max_results": {"type": "integer", "default": 100}
                }),
                &["task_list_id"],
            ),
        },
        ToolDef {
            name: "create_task",
            group: scopes::TASKS,
            description: "Creates a task with optional notes and an RFC3339 due date.",
            required_scopes: &[TASKS_SCOPE],
            read_only: false,
            input_schema: schema(
                json!({
                    "task_list_id": {"type": "string"},
                    "title": {"type": "string"},
                    "notes": {"type": "string"},
                    "due": {"type": "string"}
                }),
                &["task_list_id", "title"],
            ),
        },
    ]
}

pub async fn call(name: &str, client: GoogleClient, account: &str, args: &Value) -> AppResult<String> {
    let tasks = TasksApi::new(client);
    match name {
        "list_task_lists" => {
            let max_results = count_with_default(args, "max_results", 100, 100);
            let lists = tasks.list_task_lists(max_results).await?;
            if lists.is_empty() {
                return Ok(format!("No task lists found for {}.", account));
            }

            let lines: Vec<String> = lists
                .iter()
                .map(|l| {
                    format!(
                        "- \"{}\" (ID: {})",
                        l.get("title").and_then(|v| v.as_str()).unwrap_or("Untitled"),
                        l.get("id").and_then(|v| v.as_str()).unwrap_or("N/A")
                    )
                })
                .collect();
            Ok(format!("Found {} task lists for {}:\n{}", lists.len(), account, lines.join("\n")))
        }
        "list_tasks" => {
            let list_id = require_string(args, "task_list_id")?;
            let show_completed = bool_with_default(args, "show_completed", true);
            let max_results = count_with_default(args, "max_results", 100, 100);

            let items = tasks.list_tasks(list_id, show_completed, max_results).await?;
            if items.is_empty() {
                return Ok(format!("No tasks found in list {} for {}.", list_id, account));
            }

            let lines: Vec<String> = items.iter().map(format_task).collect();
            Ok(format!(
                "Found {} tasks in list {} for {}:\n{}",
                items.len(),
                list_id,
                account,
                lines.join("\n")
            ))
        }
        "create_task" => {
            let list_id = require_string(args, "task_list_id")?;
            let title = require_string(args, "title")?;
            info!("[create_task] Email: '{}', Title: '{}'", account, title);

            let created = tasks
                .create_task(list_id, title, optional_string(args, "notes"), optional_string(args, "due"))
                .await?;
            Ok(format!("Successfully created task for {}:\n{}", account, format_task(&created)))
        }
        _ => Err(unknown_handler(scopes::TASKS, name)),
    }
}

fn format_task(task: &Value) -> String {
    let mut line = format!(
        "- \"{}\" (ID: {}, Status: {})",
        task.get("title").and_then(|v| v.as_str()).unwrap_or("Untitled"),
        task.get("id").and_then(|v| v.as_str()).unwrap_or("N/A"),
        task.get("status").and_then(|v| v.as_str()).unwrap_or("needsAction"),
    );
    if let Some(due) = task.get("due").and_then(|v| v.as_str()) {
        line.push_str(&format!("\n  Due: {}", due));
    }
    if let Some(notes) = task.get("notes").and_then(|v| v.as_str()) {
        line.push_str(&format!("\n  Notes: {}", notes));
    }
    line
}
