//! Dashboard statistics.

use serde::{Deserialize, Serialize};

use crate::gateway::{Gateway, GatewayResult};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub open_tasks: u64,
    pub journal_entries: u64,
    pub upcoming_events: u64,
}

pub struct StatsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> StatsApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn dashboard(&self) -> GatewayResult<DashboardStats> {
        Ok(self.gateway.get::<DashboardStats>("/crm/stats").await?.unwrap_or_default())
    }
}
