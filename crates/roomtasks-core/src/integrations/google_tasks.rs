//! Google Tasks REST client.
//!
//! Talks to the Tasks API v1 with a bearer token obtained elsewhere (token
//! acquisition and refresh are not handled here). Requests run on a private
//! current-thread runtime so callers stay synchronous.

use std::time::Duration;

use chrono::NaiveDate;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::traits::{NewTask, RawTask, TaskBackend, TaskListInfo, TaskUpdate};
use crate::error::{CoreError, Result};
use crate::storage::GoogleConfig;

pub const DEFAULT_API_BASE: &str = "https://tasks.googleapis.com/tasks/v1";
const SERVICE: &str = "google";
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

pub struct GoogleTasksClient {
    api_base: String,
    access_token: String,
    http: Client,
    runtime: tokio::runtime::Runtime,
}

impl GoogleTasksClient {
    pub fn new(api_base: &str, access_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            http,
            runtime,
        })
    }

    /// Build a client from configuration, reading the token from the
    /// configured environment variable. `None` when no token is set.
    pub fn from_config(config: &GoogleConfig) -> Result<Option<Self>> {
        let token = std::env::var(&config.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty());

        match token {
            Some(token) => Ok(Some(Self::new(
                &config.api_base,
                token,
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => {
                tracing::warn!(env = %config.access_token_env, "no Google Tasks access token configured");
                Ok(None)
            }
        }
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| CoreError::InvalidInput(format!("bad API base url '{}': {e}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidInput(format!("API base url '{}' cannot have a path", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Option<Value>> {
        tracing::debug!(%method, %url, "google tasks request");

        let (status, text) = self.runtime.block_on(async {
            let mut request = self
                .http
                .request(method, url)
                .bearer_auth(&self.access_token);
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        })?;

        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::NotFound(format!("Tasks API resource: {text}")));
        }
        if !status.is_success() {
            return Err(CoreError::backend(
                SERVICE,
                format!("Tasks API error: {status} - {text}"),
            ));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let value = self
            .request(Method::GET, url, None)?
            .ok_or_else(|| CoreError::backend(SERVICE, "empty response body"))?;
        Ok(serde_json::from_value(value)?)
    }
}

impl TaskBackend for GoogleTasksClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn list_tasklists(&self) -> Result<Vec<TaskListInfo>> {
        let mut tasklists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: Page<TaskListInfo> = self.get(self.url(&["users", "@me", "lists"], &query)?)?;
            tasklists.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(tasklists)
    }

    fn list_tasks(&self, tasklist_id: &str, show_completed: bool) -> Result<Vec<RawTask>> {
        let show_completed = if show_completed { "true" } else { "false" };
        let mut tasks = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("showCompleted", show_completed),
                ("showDeleted", "false"),
                ("showHidden", "false"),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: Page<RawTask> = self.get(self.url(&["lists", tasklist_id, "tasks"], &query)?)?;
            tasks.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(tasks)
    }

    fn toggle_completion(&self, tasklist_id: &str, task_id: &str) -> Result<bool> {
        let url = self.url(&["lists", tasklist_id, "tasks", task_id], &[])?;
        let mut task: Value = self.get(url.clone())?;

        let completed = task["status"].as_str() != Some("completed");
        task["status"] = json!(if completed { "completed" } else { "needsAction" });
        if !completed {
            if let Some(fields) = task.as_object_mut() {
                fields.remove("completed");
            }
        }

        self.request(Method::PUT, url, Some(&task))?;
        Ok(completed)
    }

    fn create_task(&self, tasklist_id: &str, task: &NewTask) -> Result<RawTask> {
        let mut body = json!({
            "title": task.title,
            "notes": task.notes,
        });
        if let Some(due) = task.due {
            body["due"] = json!(due_timestamp(due));
        }
        if !task.links.is_empty() {
            body["links"] = serde_json::to_value(&task.links)?;
        }

        let created = self
            .request(Method::POST, self.url(&["lists", tasklist_id, "tasks"], &[])?, Some(&body))?
            .ok_or_else(|| CoreError::backend(SERVICE, "empty response body"))?;
        Ok(serde_json::from_value(created)?)
    }

    fn update_task(&self, tasklist_id: &str, task_id: &str, update: &TaskUpdate) -> Result<RawTask> {
        let url = self.url(&["lists", tasklist_id, "tasks", task_id], &[])?;
        let mut task: Value = self.get(url.clone())?;

        if let Some(title) = &update.title {
            task["title"] = json!(title);
        }
        if let Some(notes) = &update.notes {
            task["notes"] = json!(notes);
        }
        if let Some(due) = update.due {
            task["due"] = json!(due_timestamp(due));
        }

        let stored = match update.move_to.as_deref() {
            Some(destination) if destination != tasklist_id => {
                tracing::info!(task_id, from = tasklist_id, to = destination, "moving task");
                self.delete_task(tasklist_id, task_id)?;
                if let Some(fields) = task.as_object_mut() {
                    fields.remove("id");
                }
                self.request(Method::POST, self.url(&["lists", destination, "tasks"], &[])?, Some(&task))?
            }
            _ => self.request(Method::PUT, url, Some(&task))?,
        };

        let stored = stored.ok_or_else(|| CoreError::backend(SERVICE, "empty response body"))?;
        Ok(serde_json::from_value(stored)?)
    }

    fn delete_task(&self, tasklist_id: &str, task_id: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            self.url(&["lists", tasklist_id, "tasks", task_id], &[])?,
            None,
        )?;
        Ok(())
    }

    fn create_tasklist(&self, title: &str) -> Result<TaskListInfo> {
        let created = self
            .request(
                Method::POST,
                self.url(&["users", "@me", "lists"], &[])?,
                Some(&json!({ "title": title })),
            )?
            .ok_or_else(|| CoreError::backend(SERVICE, "empty response body"))?;
        Ok(serde_json::from_value(created)?)
    }
}

/// Due timestamp for a day. The API discards the time of day.
fn due_timestamp(day: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", day.format("%Y-%m-%d"))
}
