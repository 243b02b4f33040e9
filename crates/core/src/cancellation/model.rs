use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Whether a reason is offered in the cancel dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonStatus {
    Active,
    Inactive,
}

impl Default for ReasonStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationReason {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub reason: String,
    #[serde(default)]
    pub status: ReasonStatus,
}

impl CancellationReason {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
            status: ReasonStatus::Active,
        }
    }

    pub fn with_status(mut self, status: ReasonStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ReasonStatus::Active
    }
}

/// Reasons an admin may pick when cancelling
pub fn active_reasons(reasons: &[CancellationReason]) -> Vec<&CancellationReason> {
    reasons.iter().filter(|reason| reason.is_active()).collect()
}

/// Create/update payload for a cancellation reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationReasonInput {
    pub reason: String,
    #[serde(default)]
    pub status: ReasonStatus,
}

impl CancellationReasonInput {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            status: ReasonStatus::Active,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.reason.trim().is_empty() {
            return Err(Error::InvalidInput("Reason is required".into()));
        }
        Ok(())
    }
}
