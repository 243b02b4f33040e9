//! Single-flight access token refresh
//!
//! Concurrent requests that hit a 401 share one in-flight refresh call.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use rental_core::session::SessionContext;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Transport};

pub const DEFAULT_REFRESH_PATH: &str = "/admin/refresh";

type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<String, String>>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

pub struct RefreshCoordinator {
    transport: Arc<dyn Transport>,
    session: SessionContext,
    path: String,
    inflight: Mutex<Option<RefreshFuture>>,
}

impl RefreshCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionContext,
        path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            session,
            path: path.into(),
            inflight: Mutex::new(None),
        }
    }

    /// Obtain a token newer than `stale`.
    ///
    /// If another caller already replaced `stale` in the session, that
    /// token is returned without a network call.
    pub async fn refresh(&self, stale: Option<&str>) -> Result<String> {
        let shared = {
            let mut slot = self.inflight.lock().await;
            if let Some(current) = self.session.token().await {
                if slot.is_none() && stale.is_some_and(|s| s != current) {
                    return Ok(current);
                }
            }
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let fut = run_refresh(
                        Arc::clone(&self.transport),
                        self.session.clone(),
                        self.path.clone(),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        let outcome = shared.clone().await;

        {
            let mut slot = self.inflight.lock().await;
            if slot.as_ref().is_some_and(|pending| pending.ptr_eq(&shared)) {
                *slot = None;
            }
        }

        outcome.map_err(ClientError::RefreshFailed)
    }
}

async fn run_refresh(
    transport: Arc<dyn Transport>,
    session: SessionContext,
    path: String,
) -> std::result::Result<String, String> {
    info!("Refreshing admin access token");
    let request = ApiRequest::post(path).without_refresh();
    let response = transport
        .execute(&request)
        .await
        .map_err(|e| e.to_string())?;
    if !response.is_success() {
        let message = response.error_message();
        warn!("Token refresh rejected with HTTP {}: {}", response.status, message);
        return Err(message);
    }

    let body: RefreshResponse = response.json().map_err(|e| e.to_string())?;
    let token = body
        .token
        .or(body.access_token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "Refresh response did not include a token".to_string())?;
    session.set_token(token.clone()).await;
    Ok(token)
}
