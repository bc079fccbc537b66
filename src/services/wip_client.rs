//! Request executor for the WIP REST API.
//!
//! Every operation funnels through [`WipClient::execute`]: one authenticated
//! request out, one normalized [`ApiPayload`] or [`WipApiError`] back. Building
//! the request and classifying the response are separate pure steps
//! ([`WipClient::build_request`], [`normalize_response`]) so both can be tested
//! without a network.

use crate::config::WipConfig;
use crate::constants::network;
use crate::errors::{ToolError, WipApiError};
use crate::services::logger::Logger;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Instant;
use url::Url;

/// Escape set for identifier segments: only unreserved marks stay literal, so
/// `/ ? # ; : @ & = + , $ %` and friends are always escaped.
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One piece of a request path. `Id` segments come from caller input and are
/// percent-encoded on the way out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(&'static str),
    Id(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<PathSegment>,
}

impl ApiPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a fixed route such as `"users/me/todos"` into literal segments.
    pub fn route(route: &'static str) -> Self {
        Self {
            segments: route
                .split('/')
                .filter(|s| !s.is_empty())
                .map(PathSegment::Literal)
                .collect(),
        }
    }

    pub fn lit(mut self, segment: &'static str) -> Self {
        self.segments.push(PathSegment::Literal(segment));
        self
    }

    pub fn id(mut self, value: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Id(value.into()));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Route as written in the API docs, identifiers unescaped. Used for logs.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Literal(s) => out.push_str(s),
                PathSegment::Id(s) => out.push_str(s),
            }
        }
        out
    }
}

/// A query value as the caller supplied it. `Absent` and empty `Text` are
/// dropped before transmission.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Absent,
    Text(String),
    Number(f64),
}

impl QueryValue {
    fn render(&self) -> Option<String> {
        match self {
            QueryValue::Absent => None,
            QueryValue::Text(text) if text.is_empty() => None,
            QueryValue::Text(text) => Some(text.clone()),
            QueryValue::Number(n) => Some(n.to_string()),
        }
    }
}

impl From<Option<String>> for QueryValue {
    fn from(value: Option<String>) -> Self {
        value.map(QueryValue::Text).unwrap_or(QueryValue::Absent)
    }
}

impl From<Option<f64>> for QueryValue {
    fn from(value: Option<f64>) -> Self {
        value.map(QueryValue::Number).unwrap_or(QueryValue::Absent)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

/// Method, path, query and body of a single call, before transmission.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: ApiPath,
    pub query: Vec<(&'static str, QueryValue)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: ApiPath) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: ApiPath) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn query(mut self, key: &'static str, value: impl Into<QueryValue>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Decoded success payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// 204: nothing to decode.
    NoContent,
    Json(Value),
    /// Body that did not parse as JSON, kept verbatim.
    Text(String),
}

impl ApiPayload {
    pub fn from_body(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => ApiPayload::Json(value),
            Err(_) => ApiPayload::Text(text.to_string()),
        }
    }

    /// JSON value shown to the host. `NoContent` becomes `{"ok": true}`.
    pub fn into_value(self) -> Value {
        match self {
            ApiPayload::NoContent => serde_json::json!({ "ok": true }),
            ApiPayload::Json(value) => value,
            ApiPayload::Text(text) => Value::String(text),
        }
    }
}

/// Shape of an error body, as far as message extraction cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// JSON object carrying an `error` field.
    ErrorField(String),
    /// Bare string, either raw text or a JSON string literal. Empty bodies
    /// land here too and yield an empty message.
    Plain(String),
    Unstructured,
}

impl ErrorBody {
    pub fn classify(payload: &ApiPayload) -> Self {
        match payload {
            ApiPayload::Json(Value::Object(map)) => match map.get("error") {
                Some(Value::String(message)) => ErrorBody::ErrorField(message.clone()),
                Some(other) => ErrorBody::ErrorField(other.to_string()),
                None => ErrorBody::Unstructured,
            },
            ApiPayload::Json(Value::String(text)) | ApiPayload::Text(text) => {
                ErrorBody::Plain(text.clone())
            }
            ApiPayload::Json(_) | ApiPayload::NoContent => ErrorBody::Unstructured,
        }
    }

    pub fn message(self, status: u16) -> String {
        match self {
            ErrorBody::ErrorField(message) | ErrorBody::Plain(message) => message,
            ErrorBody::Unstructured => format!("HTTP {}", status),
        }
    }
}

/// Classifies a completed response. `body` is ignored for 204.
pub fn normalize_response(status: u16, body: &str) -> Result<ApiPayload, WipApiError> {
    if status == StatusCode::NO_CONTENT.as_u16() {
        return Ok(ApiPayload::NoContent);
    }
    let payload = ApiPayload::from_body(body);
    if (200..300).contains(&status) {
        return Ok(payload);
    }
    let message = ErrorBody::classify(&payload).message(status);
    Err(WipApiError::Api { status, message })
}

/// Authenticated client for the WIP API. Cheap to share behind an `Arc`; it
/// holds only read-only state and a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct WipClient {
    logger: Logger,
    base_url: Url,
    api_key: String,
    http: Client,
}

impl WipClient {
    /// Fails when the configuration carries no credential or a bad base URL.
    pub fn new(logger: Logger, config: &WipConfig) -> Result<Self, ToolError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| ToolError::invalid_params("WIP api_key is not configured"))?
            .to_string();
        let base_url = config.base_url()?;
        logger.add_secret(&api_key);
        let http = Client::builder()
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("client"),
            base_url,
            api_key,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for a descriptor: base + escaped path + caller query + `api_key`.
    pub fn build_url(&self, request: &RequestDescriptor) -> Result<Url, WipApiError> {
        let mut url = self.base_url.clone();
        if url.cannot_be_a_base() {
            return Err(WipApiError::InvalidRequest(
                "base URL cannot carry a path".to_string(),
            ));
        }
        let mut path = url.path().trim_end_matches('/').to_string();
        for segment in request.path.segments() {
            path.push('/');
            match segment {
                PathSegment::Literal(s) => path.push_str(s),
                PathSegment::Id(id) => path.extend(utf8_percent_encode(id, ID_SEGMENT)),
            }
        }
        url.set_path(&path);
        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                if let Some(rendered) = value.render() {
                    pairs.append_pair(key, &rendered);
                }
            }
            pairs.append_pair(network::API_KEY_PARAM, &self.api_key);
        }
        Ok(url)
    }

    pub fn build_request(&self, request: &RequestDescriptor) -> Result<reqwest::Request, WipApiError> {
        let url = self.build_url(request)?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(USER_AGENT, HeaderValue::from_static(network::USER_AGENT));
        if let Some(body) = &request.body {
            let encoded = serde_json::to_vec(body)
                .map_err(|err| WipApiError::InvalidRequest(err.to_string()))?;
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(network::JSON_CONTENT_TYPE))
                .body(encoded);
        }
        builder.build().map_err(WipApiError::transport)
    }

    /// Sends exactly one request. No retries.
    pub async fn execute(&self, request: RequestDescriptor) -> Result<ApiPayload, WipApiError> {
        let prepared = self.build_request(&request)?;
        let route = request.path.display();
        let started = Instant::now();

        let response = match self.http.execute(prepared).await {
            Ok(response) => response,
            Err(err) => {
                let err = WipApiError::transport(err);
                self.logger.error(
                    "Request failed before a response was received",
                    Some(&serde_json::json!({
                        "method": request.method.as_str(),
                        "path": route,
                        "error": err.to_string(),
                    })),
                );
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        let body = if status == StatusCode::NO_CONTENT.as_u16() {
            String::new()
        } else {
            response.text().await.map_err(WipApiError::transport)?
        };
        let outcome = normalize_response(status, &body);

        let meta = serde_json::json!({
            "method": request.method.as_str(),
            "path": route,
            "status": status,
            "duration_ms": started.elapsed().as_millis() as u64,
        });
        match &outcome {
            Ok(_) => self.logger.debug("WIP request completed", Some(&meta)),
            Err(err) => self.logger.warn(&err.to_string(), Some(&meta)),
        }
        outcome
    }
}
