//! HTTP transport
//!
//! Requests are plain values; the transport only knows how to put them
//! on the wire. Refresh and retry live in [`crate::ApiClient`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use rental_core::paging::Paged;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ClientError, Result, GENERIC_ERROR_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Bearer token attached by the client from the session
    pub bearer: Option<String>,
    /// Already resent once after a refresh
    pub retried: bool,
    /// Never trigger a refresh for this request (login, refresh itself)
    pub skip_refresh: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
            retried: false,
            skip_refresh: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    pub fn without_refresh(mut self) -> Self {
        self.skip_refresh = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the payload, unwrapping a `{ "data": ... }` envelope if present
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
        let mut value: serde_json::Value = serde_json::from_slice(body)?;
        if let Some(data) = value.as_object_mut().and_then(|obj| obj.remove("data")) {
            value = data;
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decode a list payload and keep its pagination figures.
    ///
    /// Accepts a bare array, or an object holding the rows under `data`
    /// or `items` with `total`, `page` and `limit` beside them, inside a
    /// nested `data` object, or under `pagination`.
    pub fn paged<T: DeserializeOwned>(&self) -> Result<Paged<T>> {
        let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
        let mut outer = match serde_json::from_slice::<Value>(body)? {
            Value::Null => return Ok(Paged::default()),
            Value::Object(obj) => obj,
            rows => return Ok(Paged::unpaged(serde_json::from_value(rows)?)),
        };

        let mut inner = Map::new();
        let rows = match take_rows(&mut outer) {
            Some(Value::Object(mut nested)) => {
                let rows = take_rows(&mut nested);
                inner = nested;
                rows
            }
            rows => rows,
        };
        let rows = match rows {
            Some(Value::Null) => Vec::new(),
            Some(rows) => serde_json::from_value(rows)?,
            None => return Err(ClientError::Decode("Response has no list of items".into())),
        };

        let pagination = outer
            .get("pagination")
            .or_else(|| inner.get("pagination"))
            .and_then(Value::as_object);
        let figure = |key: &str| {
            [pagination, Some(&outer), Some(&inner)]
                .into_iter()
                .flatten()
                .find_map(|source| source.get(key).and_then(Value::as_u64))
        };
        Ok(Paged {
            items: rows,
            total: figure("total"),
            page: figure("page").and_then(|n| u32::try_from(n).ok()),
            limit: figure("limit").and_then(|n| u32::try_from(n).ok()),
        })
    }

    /// Backend message for a failed response: `message`, then `error`
    pub fn error_message(&self) -> String {
        serde_json::from_slice::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|value| {
                ["message", "error"].iter().find_map(|field| {
                    value
                        .get(field)
                        .and_then(|v| v.as_str())
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }

    /// Convert a non-success response into the matching error
    pub fn into_error(self) -> ClientError {
        let message = self.error_message();
        if self.status == 401 {
            ClientError::unauthorized(message)
        } else {
            ClientError::http(self.status, message)
        }
    }
}

fn take_rows(obj: &mut Map<String, Value>) -> Option<Value> {
    obj.remove("data").or_else(|| obj.remove("items"))
}

/// Sends a single request and returns whatever the server answered
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Cookies held for the backend, as a `Cookie` header value
    fn cookies(&self) -> Option<String> {
        None
    }

    /// Seed the cookie jar from a value returned by [`Transport::cookies`]
    fn restore_cookies(&self, _cookies: &str) {}
}

/// Transport backed by reqwest with a cookie jar, so the refresh
/// cookie set at login travels with later requests
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    origin: Url,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "API base URL must be http(s): {}",
                base_url
            )));
        }
        let origin = Url::parse(&base_url)
            .and_then(|url| url.join("/"))
            .map_err(|e| ClientError::Config(format!("Invalid API base URL {}: {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            origin,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        debug!("{} {}", request.method.as_str(), url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(part) => {
                let file = reqwest::multipart::Part::bytes(part.bytes.to_vec())
                    .file_name(part.file_name.clone())
                    .mime_str(&part.mime)
                    .map_err(|e| ClientError::Upload(format!("Invalid file type: {}", e)))?;
                builder.multipart(reqwest::multipart::Form::new().part(part.field.clone(), file))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(ApiResponse { status, body })
    }

    fn cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    fn restore_cookies(&self, cookies: &str) {
        for pair in cookies.split(';').map(str::trim).filter(|p| p.contains('=')) {
            self.jar
                .add_cookie_str(&format!("{}; Path=/", pair), &self.origin);
        }
        debug!("Restored cookies for {}", self.origin);
    }
}
