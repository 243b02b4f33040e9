use rental_core::session::AdminProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::segment;
use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::transport::ApiRequest;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default, alias = "user")]
    admin: Option<AdminProfile>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub admin: Option<AdminProfile>,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    password: &'a str,
}

impl ApiClient {
    /// `POST /admin/login`; stores the returned token in the session
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let request = ApiRequest::post("/admin/login")
            .json(&LoginRequest { email, password })?
            .without_refresh();
        let body: LoginResponse = self.send_json(request).await?;
        let token = body
            .token
            .or(body.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Decode("Login response did not include a token".into()))?;

        self.session().set_token(token.clone()).await;
        if let Some(admin) = &body.admin {
            self.session().set_profile(admin.clone()).await;
        }
        info!("Logged in as {}", email);
        Ok(LoginOutcome {
            token,
            admin: body.admin,
        })
    }

    /// `GET /admin/me`; `None` when the backend reports no admin
    pub async fn me(&self) -> Result<Option<AdminProfile>> {
        let mut value: Value = self.send_json(ApiRequest::get("/admin/me")).await?;
        if let Some(admin) = value.as_object_mut().and_then(|obj| obj.remove("admin")) {
            value = admin;
        }
        if value.is_null() {
            return Ok(None);
        }
        let profile: AdminProfile = serde_json::from_value(value)?;
        self.session().set_profile(profile.clone()).await;
        Ok(Some(profile))
    }

    /// `POST /admin/logout`. The local session is cleared whatever the
    /// server answers.
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .send(ApiRequest::post("/admin/logout").without_refresh())
            .await;
        self.session().clear().await;
        if let Err(err) = &result {
            warn!("Server logout failed, local session cleared anyway: {}", err);
        }
        result.map(|_| ())
    }

    /// `POST /admin/forgotpassword`
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let request = ApiRequest::post("/admin/forgotpassword")
            .json(&ForgotPasswordRequest { email })?
            .without_refresh();
        self.send(request).await?;
        Ok(())
    }

    /// `PUT /admin/resetpassword/:token`
    pub async fn reset_password(&self, reset_token: &str, password: &str) -> Result<()> {
        let request = ApiRequest::put(format!("/admin/resetpassword/{}", segment(reset_token)))
            .json(&ResetPasswordRequest { password })?
            .without_refresh();
        self.send(request).await?;
        Ok(())
    }

    /// `POST /admin/refresh` outside the 401 path, e.g. to validate a
    /// stored session at startup
    pub async fn refresh_session(&self) -> Result<String> {
        let stale = self.session().token().await;
        self.refresher().refresh(stale.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use crate::transport::Method;
    use rental_core::session::SessionContext;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login_stores_token_and_profile() {
        let backend = Arc::new(MockBackend::new("login-token").route(
            Method::Post,
            "/admin/login",
            |_| {
                json!({
                    "token": "login-token",
                    "admin": { "_id": "a1", "name": "Admin", "email": "admin@example.com" }
                })
            },
        ));
        let client = ApiClient::new(backend.clone(), SessionContext::new());

        let outcome = client.login("admin@example.com", "secret").await.unwrap();
        assert_eq!(outcome.token, "login-token");
        assert_eq!(client.session().token().await.as_deref(), Some("login-token"));
        assert_eq!(
            client.session().profile().await.map(|p| p.id),
            Some("a1".to_string())
        );
        assert_eq!(
            backend.last_json_body("/admin/login").unwrap()["email"],
            "admin@example.com"
        );
    }

    #[tokio::test]
    async fn test_me_accepts_wrapped_admin() {
        let backend = Arc::new(MockBackend::new("t").route(Method::Get, "/admin/me", |_| {
            json!({ "success": true, "admin": { "_id": "a2", "name": "Ops", "email": "ops@example.com" } })
        }));
        let client = ApiClient::new(backend, SessionContext::with_token("t"));

        let me = client.me().await.unwrap().unwrap();
        assert_eq!(me.email, "ops@example.com");
    }

    #[tokio::test]
    async fn test_me_null_admin_is_none() {
        let backend = Arc::new(
            MockBackend::new("t").route(Method::Get, "/admin/me", |_| json!({ "data": null })),
        );
        let client = ApiClient::new(backend, SessionContext::with_token("t"));
        assert!(client.me().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_failure() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = ApiClient::new(backend.clone(), SessionContext::with_token("expired"));

        assert!(client.logout().await.is_err());
        assert!(!client.session().is_authenticated().await);
        assert_eq!(backend.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_reset_password_encodes_token() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = ApiClient::new(backend.clone(), SessionContext::new());

        client.reset_password("abc/def", "new-pass").await.unwrap();
        assert_eq!(backend.hits(Method::Put, "/admin/resetpassword/abc%2Fdef"), 1);
    }

    #[tokio::test]
    async fn test_refresh_session_replaces_stored_token() {
        let backend = Arc::new(MockBackend::new("good"));
        let client = ApiClient::new(backend.clone(), SessionContext::with_token("expired"));

        let token = client.refresh_session().await.unwrap();
        assert_eq!(token, "fresh-1");
        assert_eq!(client.session().token().await.as_deref(), Some("fresh-1"));
        assert_eq!(backend.refresh_calls(), 1);
        assert!(backend.requests()[0].skip_refresh);
    }

    #[tokio::test]
    async fn test_refresh_session_failure_keeps_token() {
        let backend = Arc::new(MockBackend::new("good").with_failing_refresh());
        let client = ApiClient::new(backend, SessionContext::with_token("expired"));

        let err = client.refresh_session().await.unwrap_err();
        assert!(matches!(err, ClientError::RefreshFailed(_)));
        assert_eq!(client.session().token().await.as_deref(), Some("expired"));
    }
}
