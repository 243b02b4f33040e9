//! Session token persisted between CLI invocations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rental_core::session::{token_expiry, AdminProfile};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_FILE: &str = ".rental-admin/session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub admin: Option<AdminProfile>,
    /// Cookie header for the API origin; carries the refresh cookie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, admin: Option<AdminProfile>) -> Self {
        Self {
            token: token.into(),
            admin,
            cookies: None,
            saved_at: Utc::now(),
        }
    }

    pub fn with_cookies(mut self, cookies: Option<String>) -> Self {
        self.cookies = cookies;
        self
    }

    /// The session to write back after a command, if anything changed.
    ///
    /// A missing token or cookie header on the live side never wipes
    /// what is stored.
    pub fn refreshed(
        &self,
        token: Option<String>,
        cookies: Option<String>,
        admin: Option<AdminProfile>,
    ) -> Option<StoredSession> {
        let token_changed = token.as_ref().is_some_and(|t| *t != self.token);
        let cookies_changed = cookies.is_some() && cookies != self.cookies;
        if !token_changed && !cookies_changed {
            return None;
        }
        Some(
            StoredSession::new(
                token.unwrap_or_else(|| self.token.clone()),
                admin.or_else(|| self.admin.clone()),
            )
            .with_cookies(cookies.or_else(|| self.cookies.clone())),
        )
    }

    /// Expiry of the stored access token, when it is a JWT
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        token_expiry(&self.token)
    }
}

pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read session file {:?}", self.path))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file {:?}", self.path))?;
        Ok(Some(session))
    }

    pub async fn save(&self, session: &StoredSession) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write session file {:?}", self.path))?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_file(&self.path)
            .await
            .with_context(|| format!("Failed to remove session file {:?}", self.path))?;
        Ok(true)
    }
}
