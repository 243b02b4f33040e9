use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Admin returned by `GET /admin/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Default)]
struct SessionInner {
    token: Option<String>,
    profile: Option<AdminProfile>,
}

/// Shared handle to the current admin session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<SessionInner>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously stored token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                token: Some(token.into()),
                profile: None,
            })),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        self.inner.write().await.token = Some(token.into());
        debug!("Session token updated");
    }

    pub async fn profile(&self) -> Option<AdminProfile> {
        self.inner.read().await.profile.clone()
    }

    pub async fn set_profile(&self, profile: AdminProfile) {
        self.inner.write().await.profile = Some(profile);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.token.is_some()
    }

    /// Drop token and profile
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.token = None;
        inner.profile = None;
        debug!("Session cleared");
    }
}
