use api_types::{
    auth::{AuthStatus, Login},
    category::{Category, CategoryNew, CategoryRename},
    icon::{Icon, IconUpdate},
};
use serde::{Serialize, de::DeserializeOwned};

use super::{Body, Request, Transport, TransportError, UploadForm};

pub const API_PREFIX: &str = "/api";

/// Path of the binary content of an icon, used both as preview reference and
/// download target.
pub fn icon_file_path(icon_id: &str) -> String {
    format!("{API_PREFIX}/icons/{icon_id}/file")
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(err) => err.status(),
            Self::Decode(_) => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Typed view of the REST endpoints on top of a [`Transport`].
#[derive(Debug, Clone)]
pub struct Api<T> {
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch<R: DeserializeOwned>(&self, request: Request) -> Result<R, ApiError> {
        let res = self.transport.request(request).await?;
        Ok(serde_json::from_value(res.data)?)
    }

    async fn send(&self, request: Request) -> Result<(), ApiError> {
        self.transport.request(request).await?;
        Ok(())
    }

    fn json<B: Serialize>(request: Request, body: &B) -> Result<Request, ApiError> {
        Ok(request.body(Body::Json(serde_json::to_value(body)?)))
    }

    pub async fn icons(&self, category_id: Option<&str>) -> Result<Vec<Icon>, ApiError> {
        let mut request = Request::get(format!("{API_PREFIX}/icons"));
        if let Some(category_id) = category_id {
            request = request.query("category_id", category_id);
        }
        self.fetch(request).await
    }

    pub async fn icon(&self, icon_id: &str) -> Result<Icon, ApiError> {
        self.fetch(Request::get(format!("{API_PREFIX}/icons/{icon_id}")))
            .await
    }

    pub async fn upload_icon(&self, form: UploadForm) -> Result<(), ApiError> {
        let request = Request::post(format!("{API_PREFIX}/icons")).body(Body::Multipart(form));
        self.send(request).await
    }

    pub async fn update_icon(&self, icon_id: &str, update: &IconUpdate) -> Result<(), ApiError> {
        let request = Self::json(Request::put(format!("{API_PREFIX}/icons/{icon_id}")), update)?;
        self.send(request).await
    }

    pub async fn delete_icon(&self, icon_id: &str) -> Result<(), ApiError> {
        self.send(Request::delete(format!("{API_PREFIX}/icons/{icon_id}")))
            .await
    }

    pub async fn download_icon(&self, icon_id: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self.transport.download(&icon_file_path(icon_id)).await?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch(Request::get(format!("{API_PREFIX}/categories")))
            .await
    }

    pub async fn create_category(&self, name: &str) -> Result<(), ApiError> {
        let payload = CategoryNew {
            name: name.to_string(),
        };
        let request = Self::json(Request::post(format!("{API_PREFIX}/categories")), &payload)?;
        self.send(request).await
    }

    pub async fn rename_category(&self, category_id: &str, name: &str) -> Result<(), ApiError> {
        let payload = CategoryRename {
            name: name.to_string(),
        };
        let request = Self::json(
            Request::put(format!("{API_PREFIX}/categories/{category_id}")),
            &payload,
        )?;
        self.send(request).await
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<(), ApiError> {
        self.send(Request::delete(format!(
            "{API_PREFIX}/categories/{category_id}"
        )))
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let payload = Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = Self::json(Request::post(format!("{API_PREFIX}/auth/login")), &payload)?;
        self.send(request).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(Request::post(format!("{API_PREFIX}/auth/logout")))
            .await
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.fetch(Request::get(format!("{API_PREFIX}/auth/status")))
            .await
    }
}
