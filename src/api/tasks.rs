//! CRM tasks.

use serde::{Deserialize, Serialize};

use crate::gateway::{Gateway, GatewayResult};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

pub struct TasksApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> TasksApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> GatewayResult<Vec<Task>> {
        Ok(self.gateway.get::<Vec<Task>>("/crm/tasks").await?.unwrap_or_default())
    }

    pub async fn create(&self, task: &NewTask) -> GatewayResult<Option<Task>> {
        self.gateway.post("/crm/tasks", task).await
    }

    pub async fn complete(&self, id: &str) -> GatewayResult<Option<Task>> {
        self.gateway
            .patch(&format!("/crm/tasks/{}", id), &serde_json::json!({ "completed": true }))
            .await
    }
}
