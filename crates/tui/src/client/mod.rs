//! HTTP transport for the icon service.
//!
//! Every call goes through [`Transport::request`], which folds network
//! failures, non-2xx statuses and unreadable bodies into a
//! [`TransportError`] instead of panicking. Session state lives in the
//! HTTP client's cookie store; callers never see a token.

mod api;

use std::{fmt, future::Future, time::Duration};

use api_types::ErrorBody;
use reqwest::{
    Url,
    header::{ACCEPT, HeaderMap, HeaderValue},
    multipart,
};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

pub use api::{API_PREFIX, Api, ApiError, icon_file_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An icon file read from disk, ready to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl IconFile {
    /// Best-effort content type from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "ico" => "image/x-icon",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Multipart payload of `POST /icons`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file: IconFile,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl UploadForm {
    fn into_multipart(self) -> std::result::Result<multipart::Form, TransportError> {
        let mime = self.file.mime_type();
        let part = multipart::Part::bytes(self.file.bytes)
            .file_name(self.file.file_name)
            .mime_str(mime)
            .map_err(|err| TransportError::Encode(err.to_string()))?;

        let mut form = multipart::Form::new().part("file", part);
        if let Some(category_id) = self.category_id {
            form = form.text("category_id", category_id);
        }
        if !self.tags.is_empty() {
            let tags = serde_json::to_string(&self.tags)
                .map_err(|err| TransportError::Encode(err.to_string()))?;
            form = form.text("tags", tags);
        }
        if let Some(description) = self.description {
            form = form.text("description", description);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized as JSON with `Content-Type: application/json`.
    Json(Value),
    /// Passed through as multipart; the client picks the boundary and content type.
    Multipart(UploadForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
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

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("server not reachable: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("cannot encode request: {0}")]
    Encode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The single request function the controller talks to.
pub trait Transport {
    fn request(
        &self,
        request: Request,
    ) -> impl Future<Output = std::result::Result<Response, TransportError>> + Send;

    /// Fetches raw bytes (icon content) instead of a JSON document.
    fn download(
        &self,
        path: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http.request(method.into(), self.url(path))
    }
}

impl Transport for HttpTransport {
    async fn request(&self, request: Request) -> std::result::Result<Response, TransportError> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = self.builder(request.method, &request.path);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Multipart(form)) => builder.multipart(form.into_multipart()?),
            None => builder,
        };

        let res = builder.send().await.map_err(send_error)?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let data = parse_body(&bytes);

        if status.is_success() {
            return Ok(Response {
                status: status.as_u16(),
                data,
            });
        }

        let message = failure_message(data)
            .unwrap_or_else(|| format!("request failed: {}", status.as_u16()));
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn download(&self, path: &str) -> std::result::Result<Vec<u8>, TransportError> {
        tracing::debug!(%path, "downloading");

        let res = self
            .builder(Method::Get, path)
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(send_error)?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let message = failure_message(parse_body(&bytes))
            .unwrap_or_else(|| format!("request failed: {}", status.as_u16()));
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// A request that could not be built never left the client.
fn send_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Encode(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

/// Unreadable bodies become an empty object.
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn failure_message(data: Value) -> Option<String> {
    serde_json::from_value::<ErrorBody>(data)
        .ok()
        .and_then(ErrorBody::into_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_body_is_empty_object() {
        assert_eq!(parse_body(b"<html>oops</html>"), Value::Object(Map::new()));
        assert_eq!(parse_body(b""), Value::Object(Map::new()));
        assert_eq!(parse_body(br#"[1,2]"#), serde_json::json!([1, 2]));
    }

    #[test]
    fn failure_message_reads_message_then_error() {
        let data = serde_json::json!({"message": "bad credentials"});
        assert_eq!(failure_message(data).as_deref(), Some("bad credentials"));

        let data = serde_json::json!({"error": "icon not found"});
        assert_eq!(failure_message(data).as_deref(), Some("icon not found"));

        assert_eq!(failure_message(serde_json::json!([])), None);
    }

    #[test]
    fn mime_type_follows_extension() {
        let file = |name: &str| IconFile {
            file_name: name.to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(file("logo.PNG").mime_type(), "image/png");
        assert_eq!(file("arrow.svg").mime_type(), "image/svg+xml");
        assert_eq!(file("README").mime_type(), "application/octet-stream");
    }

    #[test]
    fn base_url_is_validated() {
        assert!(HttpTransport::new("not a url", Duration::from_secs(1)).is_err());
        let transport = HttpTransport::new("http://127.0.0.1:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.url("/api/icons"), "http://127.0.0.1:5000/api/icons");
    }
}
