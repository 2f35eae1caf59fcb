//! Google Tasks API v1 Client

use super::client::GoogleClient;
use super::common::{extract_array, path_segment};
use crate::common::AppResult;
use serde_json::{json, Value};
use tracing::{debug, info};

const TASKS_API_BASE: &str = "https://tasks.googleapis.com/tasks/v1";

pub struct TasksApi {
    client: GoogleClient,
    base_url: String,
}

super::google_api_wrapper!(TasksApi, TASKS_API_BASE);

impl TasksApi {
    pub async fn list_task_lists(&self, max_results: u32) -> AppResult<Vec<Value>> {
        info!("Listing task lists");

        let url = format!("{}/users/@me/lists", self.base_url);
        let response = self
            .client
            .get(&url, &[("maxResults", max_results.to_string())])
            .await?;

        let lists = extract_array(&response, "items");
        debug!("Retrieved {} task lists", lists.len());
        Ok(lists)
    }

    pub async fn list_tasks(
        &self,
        task_list_id: &str,
        show_completed: bool,
        max_results: u32,
    ) -> AppResult<Vec<Value>> {
        info!("Listing tasks in list: {}", task_list_id);

        let url = format!("{}/lists/{}/tasks", self.base_url, path_segment(task_list_id));
        let response = self
            .client
            .get(
                &url,
                &[
                    ("showCompleted", show_completed.to_string()),
                    ("maxResults", max_results.to_string()),
                ],
            )
            .await?;

        let tasks = extract_array(&response, "items");
        debug!("Retrieved {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Create a task. `due` is an RFC3339 timestamp; Google keeps only the date.
    pub async fn create_task(
        &self,
        task_list_id: &str,
        title: &str,
        notes: Option<&str>,
        due: Option<&str>,
    ) -> AppResult<Value> {
        info!("Creating task '{}' in list: {}", title, task_list_id);

        let mut task = json!({ "title": title });
        if let Some(notes) = notes {
            task["notes"] = json!(notes);
        }
        if let Some(due) = due {
            task["due"] = json!(due);
        }

        let url = format!("{}/lists/{}/tasks", self.base_url, path_segment(task_list_id));
        self.client.post(&url, &[], &task).await
    }
}
