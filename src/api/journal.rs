//! Journal entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::{Gateway, GatewayResult};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for creating or replacing an entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewJournalEntry {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

pub struct JournalApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> JournalApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> GatewayResult<Vec<JournalEntry>> {
        Ok(self.gateway.get::<Vec<JournalEntry>>("/journal/entries").await?.unwrap_or_default())
    }

    pub async fn create(&self, entry: &NewJournalEntry) -> GatewayResult<Option<JournalEntry>> {
        self.gateway.post("/journal/entries", entry).await
    }

    pub async fn update(&self, id: &str, entry: &NewJournalEntry) -> GatewayResult<Option<JournalEntry>> {
        self.gateway.put(&format!("/journal/entries/{}", id), entry).await
    }

    /// Deletions usually answer without a body.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.gateway
            .delete::<Value>(&format!("/journal/entries/{}", id))
            .await
            .map(|_| ())
    }
}
