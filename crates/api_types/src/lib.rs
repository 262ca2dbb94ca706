//! Wire types of the icon service REST API.
//!
//! The server stores ids as integers but clients treat them as opaque
//! strings, so every id field accepts either a JSON number or a JSON string.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of an error response. The server uses `message` on some routes and
/// `error` on others.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

mod id {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    impl From<RawId> for String {
        fn from(value: RawId) -> Self {
            match value {
                RawId::Number(n) => n.to_string(),
                RawId::Text(s) => s,
            }
        }
    }

    pub fn required<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(String::from)
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawId>::deserialize(deserializer)?;
        Ok(raw.map(String::from).filter(|id| !id.is_empty()))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        #[serde(deserialize_with = "id::required")]
        pub id: String,
        pub name: String,
        /// Number of icons in the category, when the server reports it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub icon_count: Option<u64>,
    }

    /// Request body for `POST /categories`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    /// Request body for `PUT /categories/<id>`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRename {
        pub name: String,
    }
}

pub mod icon {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Icon {
        #[serde(deserialize_with = "id::required")]
        pub id: String,
        pub filename: String,
        #[serde(default, deserialize_with = "id::optional")]
        pub category_id: Option<String>,
        #[serde(default, deserialize_with = "null_as_empty")]
        pub tags: Vec<String>,
        #[serde(default)]
        pub description: Option<String>,
    }

    /// Request body for `PUT /icons/<id>`. The server only touches the
    /// fields that are present.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IconUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tags: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    impl IconUpdate {
        pub fn move_to(category_id: impl Into<String>) -> Self {
            Self {
                category_id: Some(category_id.into()),
                ..Self::default()
            }
        }

        pub fn is_empty(&self) -> bool {
            self.category_id.is_none() && self.tags.is_none() && self.description.is_none()
        }
    }
}

pub mod auth {
    use super::*;

    /// Request body for `POST /auth/login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    /// Response body of `GET /auth/status`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AuthStatus {
        #[serde(default)]
        pub logged_in: bool,
        #[serde(default)]
        pub user: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ErrorBody,
        auth::AuthStatus,
        category::Category,
        icon::{Icon, IconUpdate},
    };

    #[test]
    fn numeric_ids_become_strings() {
        let icon: Icon = serde_json::from_str(
            r#"{"id": 7, "filename": "a.png", "category_id": 3, "tags": ["x"], "path": "misc/a.png"}"#,
        )
        .unwrap();
        assert_eq!(icon.id, "7");
        assert_eq!(icon.category_id.as_deref(), Some("3"));
        assert_eq!(icon.tags, vec!["x".to_string()]);
        assert_eq!(icon.description, None);
    }

    #[test]
    fn missing_or_null_icon_fields_default() {
        let icon: Icon =
            serde_json::from_str(r#"{"id": "a1", "filename": "b.svg", "category_id": null, "tags": null}"#)
                .unwrap();
        assert_eq!(icon.category_id, None);
        assert!(icon.tags.is_empty());

        let icon: Icon = serde_json::from_str(r#"{"id": "a2", "filename": "c.svg"}"#).unwrap();
        assert_eq!(icon.category_id, None);
        assert!(icon.tags.is_empty());
    }

    #[test]
    fn category_ignores_extra_fields() {
        let category: Category = serde_json::from_str(
            r#"{"id": 2, "name": "Tools", "created_at": "2024-01-01T00:00:00", "icon_count": 4}"#,
        )
        .unwrap();
        assert_eq!(category.id, "2");
        assert_eq!(category.name, "Tools");
        assert_eq!(category.icon_count, Some(4));
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": "bad credentials", "error": "other"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"error": "not found"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("not found"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn icon_update_sends_only_present_fields() {
        let update = IconUpdate::move_to("4");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"category_id": "4"})
        );

        let update = IconUpdate {
            tags: Some(vec!["ui".to_string()]),
            description: Some(String::new()),
            ..IconUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"tags": ["ui"], "description": ""})
        );
        assert!(IconUpdate::default().is_empty());
    }

    #[test]
    fn auth_status_defaults_to_logged_out() {
        let status: AuthStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.logged_in);
    }
}
