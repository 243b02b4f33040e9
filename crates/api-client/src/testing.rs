//! In-process backend double used by the client tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};

const PUBLIC_PATHS: [&str; 3] = ["/admin/login", "/admin/forgotpassword", "/admin/resetpassword"];

type Route = Box<dyn Fn(&ApiRequest) -> Value + Send + Sync>;

pub struct MockBackend {
    valid_token: Mutex<String>,
    refresh_calls: AtomicUsize,
    refresh_delay: Duration,
    refresh_fails: bool,
    reject_everything: bool,
    requests: Mutex<Vec<ApiRequest>>,
    routes: HashMap<(Method, String), Route>,
    delays: HashMap<String, Duration>,
}

impl MockBackend {
    pub fn new(valid_token: &str) -> Self {
        Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh_calls: AtomicUsize::new(0),
            refresh_delay: Duration::ZERO,
            refresh_fails: false,
            reject_everything: false,
            requests: Mutex::new(Vec::new()),
            routes: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn with_failing_refresh(mut self) -> Self {
        self.refresh_fails = true;
        self
    }

    /// Hold every answer on `path` back by `delay`
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn rejecting_everything(mut self) -> Self {
        self.reject_everything = true;
        self
    }

    /// Answer `method path` with the JSON produced by `handler`
    pub fn route(
        mut self,
        method: Method,
        path: &str,
        handler: impl Fn(&ApiRequest) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.routes.insert((method, path.to_string()), Box::new(handler));
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn valid_token(&self) -> Option<String> {
        Some(self.valid_token.lock().unwrap().clone())
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to `path`, retries included
    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_json_body(&self, path: &str) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .and_then(|r| match &r.body {
                RequestBody::Json(value) => Some(value.clone()),
                _ => None,
            })
    }
}

#[async_trait]
impl Transport for MockBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delays.get(&request.path) {
            tokio::time::sleep(*delay).await;
        }

        if request.path == "/admin/refresh" {
            let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.refresh_delay.is_zero() {
                tokio::time::sleep(self.refresh_delay).await;
            }
            if self.refresh_fails {
                return Ok(ApiResponse::new(401, json!({ "message": "Refresh expired" }).to_string()));
            }
            let token = format!("fresh-{}", call);
            *self.valid_token.lock().unwrap() = token.clone();
            return Ok(ApiResponse::new(200, json!({ "token": token }).to_string()));
        }

        let public = PUBLIC_PATHS.iter().any(|p| request.path.starts_with(p));
        let authorized = public
            || (!self.reject_everything
                && request.bearer.as_deref() == Some(self.valid_token.lock().unwrap().as_str()));
        if !authorized && !request.skip_refresh {
            return Ok(ApiResponse::new(401, json!({ "message": "Token expired" }).to_string()));
        }
        if !authorized {
            return Ok(ApiResponse::new(401, json!({ "message": "Invalid credentials" }).to_string()));
        }

        if let Some(handler) = self.routes.get(&(request.method, request.path.clone())) {
            return Ok(ApiResponse::new(200, handler(request).to_string()));
        }
        if request.path == "/missing" {
            return Ok(ApiResponse::new(404, json!({ "message": "Route not found" }).to_string()));
        }
        Ok(ApiResponse::new(
            200,
            json!({ "data": { "path": request.path } }).to_string(),
        ))
    }
}
