#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use iconbox_tui::client::{Body, Method, Request, Response, Transport, TransportError};
use serde_json::{Value, json};
use tokio::sync::Notify;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
struct StoredIcon {
    id: u64,
    filename: String,
    category_id: Option<u64>,
    tags: Vec<String>,
    description: Option<String>,
    bytes: Vec<u8>,
}

impl StoredIcon {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "filename": self.filename,
            "category_id": self.category_id,
            "tags": self.tags,
            "description": self.description,
            "created_at": "2024-05-01T10:00:00",
        })
    }
}

#[derive(Debug, Default)]
struct Inner {
    logged_in: bool,
    next_id: u64,
    categories: Vec<(u64, String)>,
    icons: Vec<StoredIcon>,
    requests: Vec<(Method, String)>,
    failures: HashMap<(Method, String), (u16, String)>,
    gates: HashMap<(Method, String), Arc<Notify>>,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn categories_json(&self) -> Value {
        Value::Array(
            self.categories
                .iter()
                .map(|(id, name)| {
                    let count = self
                        .icons
                        .iter()
                        .filter(|icon| icon.category_id == Some(*id))
                        .count();
                    json!({"id": id, "name": name, "icon_count": count})
                })
                .collect(),
        )
    }
}

/// In-memory icon service speaking the same REST surface as the real one.
#[derive(Debug, Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

fn status(status: u16, message: &str) -> TransportError {
    TransportError::Status {
        status,
        message: message.to_string(),
    }
}

/// Path plus query string, as the request would appear in an access log.
fn describe(request: &Request) -> String {
    if request.query.is_empty() {
        return request.path.clone();
    }
    let query: Vec<String> = request
        .query
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("{}?{}", request.path, query.join("&"))
}

fn ok(data: Value) -> Result<Response, TransportError> {
    Ok(Response { status: 200, data })
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing admin session.
    pub fn logged_in(self) -> Self {
        self.lock().logged_in = true;
        self
    }

    pub fn with_category(self, name: &str) -> Self {
        {
            let mut inner = self.lock();
            let id = inner.next_id();
            inner.categories.push((id, name.to_string()));
        }
        self
    }

    pub fn with_icon(self, filename: &str, category: Option<&str>) -> Self {
        {
            let mut inner = self.lock();
            let category_id = category.and_then(|name| {
                inner
                    .categories
                    .iter()
                    .find(|(_, existing)| existing == name)
                    .map(|(id, _)| *id)
            });
            let id = inner.next_id();
            inner.icons.push(StoredIcon {
                id,
                filename: filename.to_string(),
                category_id,
                tags: Vec::new(),
                description: None,
                bytes: format!("<svg id=\"{id}\"/>").into_bytes(),
            });
        }
        self
    }

    /// Removes a category behind the client's back.
    pub fn remove_category(&self, name: &str) {
        let mut inner = self.lock();
        let removed: Vec<u64> = inner
            .categories
            .iter()
            .filter(|(_, existing)| existing == name)
            .map(|(id, _)| *id)
            .collect();
        inner.categories.retain(|(_, existing)| existing != name);
        for icon in inner.icons.iter_mut() {
            if icon.category_id.is_some_and(|id| removed.contains(&id)) {
                icon.category_id = None;
            }
        }
    }

    /// Every later `method path` call fails with `status` and `message`.
    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) {
        self.lock()
            .failures
            .insert((method, path.to_string()), (status, message.to_string()));
    }

    /// Later `method path` calls wait until the returned gate is notified,
    /// once per call.
    pub fn hold(&self, method: Method, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock()
            .gates
            .insert((method, path.to_string()), Arc::clone(&gate));
        gate
    }

    pub fn recover(&self, method: Method, path: &str) {
        self.lock().failures.remove(&(method, path.to_string()));
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<(Method, String)> {
        self.lock().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn mutating_requests(&self) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|(method, path)| *method != Method::Get && !path.starts_with("/api/auth"))
            .count()
    }

    pub fn category_id(&self, name: &str) -> Option<String> {
        self.lock()
            .categories
            .iter()
            .find(|(_, existing)| existing == name)
            .map(|(id, _)| id.to_string())
    }

    pub fn icon_id(&self, filename: &str) -> Option<String> {
        self.lock()
            .icons
            .iter()
            .find(|icon| icon.filename == filename)
            .map(|icon| icon.id.to_string())
    }

    pub fn icon_category(&self, filename: &str) -> Option<String> {
        self.lock()
            .icons
            .iter()
            .find(|icon| icon.filename == filename)
            .and_then(|icon| icon.category_id)
            .map(|id| id.to_string())
    }

    pub fn icon_count(&self) -> usize {
        self.lock().icons.len()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.lock()
            .categories
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub fn icon_tags(&self, filename: &str) -> Vec<String> {
        self.lock()
            .icons
            .iter()
            .find(|icon| icon.filename == filename)
            .map(|icon| icon.tags.clone())
            .unwrap_or_default()
    }

    pub fn icon_description(&self, filename: &str) -> Option<String> {
        self.lock()
            .icons
            .iter()
            .find(|icon| icon.filename == filename)
            .and_then(|icon| icon.description.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn route(&self, request: Request) -> Result<Response, TransportError> {
        let mut inner = self.lock();
        inner.requests.push((request.method, describe(&request)));
        if let Some((code, message)) = inner
            .failures
            .get(&(request.method, request.path.clone()))
            .cloned()
        {
            return Err(status(code, &message));
        }

        let segments: Vec<&str> = request
            .path
            .trim_start_matches("/api/")
            .split('/')
            .collect();
        let admin = inner.logged_in;
        let json_body = match &request.body {
            Some(Body::Json(value)) => value.clone(),
            _ => Value::Null,
        };

        match (request.method, segments.as_slice()) {
            (Method::Get, ["auth", "status"]) => ok(json!({
                "logged_in": inner.logged_in,
                "user": inner.logged_in.then_some(USERNAME),
            })),
            (Method::Post, ["auth", "login"]) => {
                if json_body["username"] == USERNAME && json_body["password"] == PASSWORD {
                    inner.logged_in = true;
                    ok(json!({"message": "Login successful"}))
                } else {
                    Err(status(401, "Invalid credentials"))
                }
            }
            (Method::Post, ["auth", "logout"]) => {
                inner.logged_in = false;
                ok(json!({"message": "Logout successful"}))
            }
            (_, ["categories", ..] | ["icons", ..]) if request.method != Method::Get && !admin => {
                Err(status(401, "Authentication required"))
            }
            (Method::Get, ["categories"]) => ok(inner.categories_json()),
            (Method::Post, ["categories"]) => {
                let name = json_body["name"].as_str().unwrap_or_default().trim().to_string();
                if name.is_empty() {
                    return Err(status(400, "Category name is required"));
                }
                if inner.categories.iter().any(|(_, existing)| *existing == name) {
                    return Err(status(400, "Category already exists"));
                }
                let id = inner.next_id();
                inner.categories.push((id, name.clone()));
                ok(json!({"id": id, "name": name}))
            }
            (Method::Put, ["categories", id]) => {
                let name = json_body["name"].as_str().unwrap_or_default().trim().to_string();
                if name.is_empty() {
                    return Err(status(400, "Category name is required"));
                }
                let id: u64 = id.parse().map_err(|_| status(404, "Category not found"))?;
                if inner
                    .categories
                    .iter()
                    .any(|(existing_id, existing)| *existing == name && *existing_id != id)
                {
                    return Err(status(400, "Category already exists"));
                }
                let Some(category) = inner
                    .categories
                    .iter_mut()
                    .find(|(existing, _)| *existing == id)
                else {
                    return Err(status(404, "Category not found"));
                };
                category.1 = name.clone();
                ok(json!({"id": id, "name": name}))
            }
            (Method::Delete, ["categories", id]) => {
                let id: u64 = id.parse().map_err(|_| status(404, "Category not found"))?;
                let before = inner.categories.len();
                inner.categories.retain(|(existing, _)| *existing != id);
                if inner.categories.len() == before {
                    return Err(status(404, "Category not found"));
                }
                for icon in inner.icons.iter_mut() {
                    if icon.category_id == Some(id) {
                        icon.category_id = None;
                    }
                }
                ok(json!({"message": "Category deleted"}))
            }
            (Method::Get, ["icons"]) => {
                let filter = request
                    .query
                    .iter()
                    .find(|(name, _)| name == "category_id")
                    .and_then(|(_, value)| value.parse::<u64>().ok());
                let icons = inner
                    .icons
                    .iter()
                    .filter(|icon| filter.is_none() || icon.category_id == filter)
                    .map(StoredIcon::to_json)
                    .collect();
                ok(Value::Array(icons))
            }
            (Method::Get, ["icons", id]) => inner
                .icons
                .iter()
                .find(|icon| icon.id.to_string() == *id)
                .map(|icon| ok(icon.to_json()))
                .unwrap_or_else(|| Err(status(404, "Icon not found"))),
            (Method::Post, ["icons"]) => {
                let Some(Body::Multipart(form)) = request.body else {
                    return Err(status(400, "No file provided"));
                };
                let id = inner.next_id();
                let icon = StoredIcon {
                    id,
                    filename: form.file.file_name,
                    category_id: form.category_id.and_then(|id| id.parse().ok()),
                    tags: form.tags,
                    description: form.description,
                    bytes: form.file.bytes,
                };
                let data = icon.to_json();
                inner.icons.push(icon);
                ok(data)
            }
            (Method::Put, ["icons", id]) => {
                let Some(icon) = inner.icons.iter_mut().find(|icon| icon.id.to_string() == *id)
                else {
                    return Err(status(404, "Icon not found"));
                };
                if let Some(category_id) = json_body.get("category_id") {
                    icon.category_id = category_id.as_str().and_then(|id| id.parse::<u64>().ok());
                }
                if let Some(tags) = json_body.get("tags").and_then(Value::as_array) {
                    icon.tags = tags
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect();
                }
                if let Some(description) = json_body.get("description").and_then(Value::as_str) {
                    icon.description = Some(description.to_string());
                }
                ok(icon.to_json())
            }
            (Method::Delete, ["icons", id]) => {
                let before = inner.icons.len();
                inner.icons.retain(|icon| icon.id.to_string() != *id);
                if inner.icons.len() == before {
                    return Err(status(404, "Icon not found"));
                }
                ok(json!({"message": "Icon deleted"}))
            }
            _ => Err(status(404, "Not found")),
        }
    }
}

impl Transport for FakeBackend {
    async fn request(&self, request: Request) -> Result<Response, TransportError> {
        let gate = self
            .lock()
            .gates
            .get(&(request.method, request.path.clone()))
            .cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.route(request)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.lock();
        inner.requests.push((Method::Get, path.to_string()));
        if let Some((code, message)) = inner.failures.get(&(Method::Get, path.to_string())).cloned() {
            return Err(status(code, &message));
        }
        let id = path
            .trim_start_matches("/api/icons/")
            .trim_end_matches("/file");
        inner
            .icons
            .iter()
            .find(|icon| icon.id.to_string() == id)
            .map(|icon| icon.bytes.clone())
            .ok_or_else(|| status(404, "Icon not found"))
    }
}
