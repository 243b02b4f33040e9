//! API client with transparent token refresh

use std::sync::Arc;

use rental_core::paging::Paged;
use rental_core::session::SessionContext;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::refresh::RefreshCoordinator;
use crate::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Sends requests with the session's bearer token.
///
/// A 401 on a request that has not been retried yet triggers one shared
/// refresh and a single resend with the new token.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionContext,
    refresher: Arc<RefreshCoordinator>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionContext) -> Self {
        Self::with_refresh_path(transport, session, crate::refresh::DEFAULT_REFRESH_PATH)
    }

    pub fn with_refresh_path(
        transport: Arc<dyn Transport>,
        session: SessionContext,
        refresh_path: impl Into<String>,
    ) -> Self {
        let refresher = Arc::new(RefreshCoordinator::new(
            Arc::clone(&transport),
            session.clone(),
            refresh_path,
        ));
        Self {
            transport,
            session,
            refresher,
        }
    }

    /// Build a client talking to the configured backend over HTTP
    pub fn from_config(config: &ClientConfig, session: SessionContext) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.base_url, config.request_timeout)?;
        Ok(Self::with_refresh_path(
            Arc::new(transport),
            session,
            config.refresh_path.clone(),
        ))
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Backend cookies (the refresh cookie among them) to carry into a
    /// later process
    pub fn cookies(&self) -> Option<String> {
        self.transport.cookies()
    }

    pub fn restore_cookies(&self, cookies: &str) {
        self.transport.restore_cookies(cookies);
    }

    pub(crate) fn refresher(&self) -> &RefreshCoordinator {
        &self.refresher
    }

    /// Send a request; non-success responses become errors
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if request.bearer.is_none() {
            request.bearer = self.session.token().await;
        }

        let response = self.transport.execute(&request).await?;
        if response.status != 401 || request.retried || request.skip_refresh {
            return into_result(response);
        }

        let original = response.into_error();
        info!(
            "{} {} returned 401, attempting token refresh",
            request.method.as_str(),
            request.path
        );

        let token = match self.refresher.refresh(request.bearer.as_deref()).await {
            Ok(token) => token,
            Err(err) => {
                warn!("{}", err);
                return Err(original);
            }
        };

        request.bearer = Some(token);
        request.retried = true;
        debug!("Retrying {} {}", request.method.as_str(), request.path);
        let response = self.transport.execute(&request).await?;
        into_result(response)
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    pub async fn send_paged<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Paged<T>> {
        self.send(request).await?.paged()
    }
}

fn into_result(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(response.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::MockBackend;
    use serde_json::Value;
    use std::time::Duration;

    fn client_for(backend: &Arc<MockBackend>, token: &str) -> ApiClient {
        ApiClient::new(backend.clone(), SessionContext::with_token(token))
    }

    #[tokio::test]
    async fn test_valid_token_needs_no_refresh() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = client_for(&backend, "good");

        let body: Value = client.send_json(ApiRequest::get("/orders")).await.unwrap();
        assert_eq!(body["path"], "/orders");
        assert_eq!(backend.refresh_calls(), 0);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_and_retries_once() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = client_for(&backend, "expired");

        let body: Value = client.send_json(ApiRequest::get("/orders")).await.unwrap();
        assert_eq!(body["path"], "/orders");
        assert_eq!(backend.refresh_calls(), 1);

        let requests = backend.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].bearer.as_deref(), Some("expired"));
        assert_eq!(requests[1].path, "/admin/refresh");
        assert!(requests[1].bearer.is_none());
        assert_eq!(requests[2].bearer, backend.valid_token());
        assert!(requests[2].retried);
        assert_eq!(client.session().token().await, backend.valid_token());
    }

    #[tokio::test]
    async fn test_second_401_is_not_refreshed_again() {
        let backend = Arc::new(MockBackend::new("good").rejecting_everything());
        let client = client_for(&backend, "expired");

        let err = client.send(ApiRequest::get("/orders")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(backend.refresh_calls(), 1);
        assert_eq!(backend.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_propagates_original_error() {
        let backend = Arc::new(MockBackend::new("good").with_failing_refresh());
        let client = client_for(&backend, "expired");

        let err = client.send(ApiRequest::get("/orders")).await.unwrap_err();
        match err {
            ClientError::Unauthorized { message } => assert_eq!(message, "Token expired"),
            other => panic!("Expected Unauthorized, got: {:?}", other),
        }
        assert_eq!(backend.refresh_calls(), 1);
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let backend = Arc::new(MockBackend::new("good").with_refresh_delay(Duration::from_millis(50)));
        let client = client_for(&backend, "expired");

        let calls = (0..5).map(|i| {
            let client = client.clone();
            async move {
                client
                    .send_json::<Value>(ApiRequest::get(format!("/orders/{}", i)))
                    .await
            }
        });
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(backend.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_late_401_reuses_already_refreshed_token() {
        let backend = Arc::new(MockBackend::new("good"));
        let session = SessionContext::with_token("expired");
        let client = ApiClient::new(backend.clone(), session.clone());

        client.send(ApiRequest::get("/orders")).await.unwrap();
        assert_eq!(backend.refresh_calls(), 1);

        // a request that went out with the old token before the refresh landed
        let mut late = ApiRequest::get("/cars");
        late.bearer = Some("expired".into());
        client.send(late).await.unwrap();
        assert_eq!(backend.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_skip_refresh_requests_fail_immediately() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = client_for(&backend, "expired");

        let err = client
            .send(ApiRequest::post("/admin/logout").without_refresh())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(backend.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_http_errors_carry_backend_message() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = client_for(&backend, "good");

        let err = client.send(ApiRequest::get("/missing")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.user_message(), "Route not found");
    }
}
