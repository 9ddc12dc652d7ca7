//! Team directory.

use serde::{Deserialize, Serialize};

use crate::gateway::{Gateway, GatewayResult};

/// A member of the team directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

pub struct UsersApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> UsersApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> GatewayResult<Vec<User>> {
        Ok(self.gateway.get::<Vec<User>>("/crm/users").await?.unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> GatewayResult<Option<User>> {
        self.gateway.get(&format!("/crm/users/{}", id)).await
    }
}
