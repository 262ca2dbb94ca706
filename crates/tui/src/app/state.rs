use std::collections::VecDeque;

use api_types::{category::Category, icon::Icon};
use chrono::{DateTime, Local};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    All,
    Categories,
    Upload,
    Login,
}

impl View {
    pub const ALL: [View; 4] = [View::All, View::Categories, View::Upload, View::Login];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Icons",
            Self::Categories => "Categories",
            Self::Upload => "Upload",
            Self::Login => "Login",
        }
    }

    /// Views whose navigation entry only exists for a logged-in admin.
    pub fn requires_login(self) -> bool {
        matches!(self, Self::Categories | Self::Upload)
    }
}

/// Icon list as last rendered. Replaced wholesale by every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IconList {
    #[default]
    Loading,
    Loaded(Vec<Icon>),
    Failed(String),
}

impl IconList {
    pub fn icons(&self) -> &[Icon] {
        match self {
            Self::Loaded(icons) => icons,
            Self::Loading | Self::Failed(_) => &[],
        }
    }

    pub fn find(&self, icon_id: &str) -> Option<&Icon> {
        self.icons().iter().find(|icon| icon.id == icon_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    UploadFile,
    UploadTags,
    UploadDescription,
    CategoryName,
    CategoryRename,
    IconTags,
    IconDescription,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Username,
        Field::Password,
        Field::UploadFile,
        Field::UploadTags,
        Field::UploadDescription,
        Field::CategoryName,
        Field::CategoryRename,
        Field::IconTags,
        Field::IconDescription,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
            Self::UploadFile => "Files",
            Self::UploadTags | Self::IconTags => "Tags",
            Self::UploadDescription | Self::IconDescription => "Description",
            Self::CategoryName => "New category",
            Self::CategoryRename => "Rename to",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    Backspace,
    Clear,
    Set(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub file_path: String,
    pub category_id: Option<String>,
    pub tags: String,
    pub description: String,
    pub error: Option<String>,
}

/// Comma separated tags, trimmed, empty entries dropped.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl UploadDraft {
    pub const PATH_SEPARATOR: char = ';';

    /// Files to upload; several paths are separated by `;`.
    pub fn file_paths(&self) -> Vec<String> {
        self.file_path
            .split(Self::PATH_SEPARATOR)
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }

    pub fn description(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub error: Option<String>,
}

/// Inline rename of one category row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameDraft {
    pub id: String,
    pub name: String,
    pub error: Option<String>,
}

/// Tag and description editor opened on one icon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconEditDraft {
    pub id: String,
    pub filename: String,
    pub tags: String,
    pub description: String,
    pub error: Option<String>,
}

impl IconEditDraft {
    pub fn for_icon(icon: &Icon) -> Self {
        Self {
            id: icon.id.clone(),
            filename: icon.filename.clone(),
            tags: icon.tags.join(", "),
            description: icon.description.clone().unwrap_or_default(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    DeleteIcon { id: String, filename: String },
    DeleteCategory { id: String, name: String },
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteIcon { filename, .. } => {
                format!("Delete icon \"{filename}\"? This cannot be undone.")
            }
            Self::DeleteCategory { name, .. } => {
                format!("Delete category \"{name}\"? Its icons become uncategorized.")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub logged_in: bool,
    pub view: View,
    pub categories: Vec<Category>,
    pub selected_category: Option<String>,
    pub icons: IconList,
    pub login: LoginForm,
    pub upload: UploadDraft,
    pub new_category: CategoryDraft,
    pub rename: Option<RenameDraft>,
    pub icon_edit: Option<IconEditDraft>,
    pub notices: VecDeque<Notice>,
    pub pending: Option<PendingConfirm>,
    pub detail: Option<Icon>,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(username: &str) -> Self {
        Self {
            login: LoginForm {
                username: username.to_string(),
                ..LoginForm::default()
            },
            ..Self::default()
        }
    }

    pub fn select_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn apply_login(&mut self) {
        self.logged_in = true;
        self.view = View::All;
        self.login = LoginForm::default();
    }

    pub fn apply_logout(&mut self) {
        self.logged_in = false;
        self.pending = None;
        self.rename = None;
        self.icon_edit = None;
        if self.view.requires_login() {
            self.view = View::All;
        }
    }

    pub fn has_category(&self, category_id: &str) -> bool {
        self.categories
            .iter()
            .any(|category| category.id == category_id)
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
    }

    /// Display name of an icon's category.
    pub fn category_name(&self, category_id: Option<&str>) -> &str {
        category_id
            .and_then(|id| self.category(id))
            .map(|category| category.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Sets the icon filter. Ids that are not in the category cache clear it.
    pub fn set_filter(&mut self, category_id: Option<String>) {
        let category_id = category_id.filter(|id| !id.is_empty() && self.has_category(id));
        self.selected_category = category_id;
    }

    /// Replaces the category cache. Returns `true` when the active filter
    /// pointed at a category that no longer exists and was reset.
    pub fn replace_categories(&mut self, categories: Vec<Category>) -> bool {
        self.categories = categories;

        if self
            .rename
            .as_ref()
            .is_some_and(|draft| !self.has_category(&draft.id))
        {
            self.rename = None;
        }

        let dangling_upload = self
            .upload
            .category_id
            .as_deref()
            .is_some_and(|id| !self.has_category(id));
        if dangling_upload {
            self.upload.category_id = None;
        }

        let dangling_filter = self
            .selected_category
            .as_deref()
            .is_some_and(|id| !self.has_category(id));
        if dangling_filter {
            self.selected_category = None;
        }
        dangling_filter
    }

    pub fn start_icon_load(&mut self) {
        self.icons = IconList::Loading;
    }

    pub fn apply_icons(&mut self, icons: Vec<Icon>, at: DateTime<Local>) {
        self.icons = IconList::Loaded(icons);
        self.last_refresh = Some(at);
    }

    pub fn fail_icons(&mut self, message: String) {
        self.icons = IconList::Failed(message);
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn set_upload_category(&mut self, category_id: Option<String>) {
        let category_id = category_id.filter(|id| !id.is_empty() && self.has_category(id));
        self.upload.category_id = category_id;
    }

    /// Applies a key press to a text field. Fields of a closed editor are
    /// ignored.
    pub fn edit_field(&mut self, field: Field, edit: FieldEdit) {
        let value = match field {
            Field::Username => &mut self.login.username,
            Field::Password => &mut self.login.password,
            Field::UploadFile => &mut self.upload.file_path,
            Field::UploadTags => &mut self.upload.tags,
            Field::UploadDescription => &mut self.upload.description,
            Field::CategoryName => &mut self.new_category.name,
            Field::CategoryRename => match self.rename.as_mut() {
                Some(draft) => &mut draft.name,
                None => return,
            },
            Field::IconTags => match self.icon_edit.as_mut() {
                Some(draft) => &mut draft.tags,
                None => return,
            },
            Field::IconDescription => match self.icon_edit.as_mut() {
                Some(draft) => &mut draft.description,
                None => return,
            },
        };
        match edit {
            FieldEdit::Insert(ch) => value.push(ch),
            FieldEdit::Backspace => {
                value.pop();
            }
            FieldEdit::Clear => value.clear(),
            FieldEdit::Set(text) => *value = text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon_count: None,
        }
    }

    #[test]
    fn logout_leaves_admin_views() {
        let mut state = AppState::default();
        state.apply_login();
        state.select_view(View::Upload);
        state.apply_logout();
        assert_eq!(state.view, View::All);

        state.select_view(View::Login);
        state.apply_logout();
        assert_eq!(state.view, View::Login);
    }

    #[test]
    fn login_clears_form_and_returns_to_all() {
        let mut state = AppState::new("admin");
        state.login.password = "secret".to_string();
        state.login.error = Some("old".to_string());
        state.select_view(View::Login);
        state.apply_login();
        assert!(state.logged_in);
        assert_eq!(state.view, View::All);
        assert_eq!(state.login, LoginForm::default());
    }

    #[test]
    fn filter_only_accepts_known_categories() {
        let mut state = AppState::default();
        state.replace_categories(vec![category("1", "Tools")]);
        state.set_filter(Some("1".to_string()));
        assert_eq!(state.selected_category.as_deref(), Some("1"));
        state.set_filter(Some("9".to_string()));
        assert_eq!(state.selected_category, None);
        state.set_filter(Some(String::new()));
        assert_eq!(state.selected_category, None);
    }

    #[test]
    fn dangling_filter_resets_on_category_refresh() {
        let mut state = AppState::default();
        state.replace_categories(vec![category("1", "Tools"), category("2", "Arrows")]);
        state.set_filter(Some("2".to_string()));
        state.set_upload_category(Some("2".to_string()));

        assert!(!state.replace_categories(vec![category("1", "Tools"), category("2", "Arrows")]));
        assert!(state.replace_categories(vec![category("1", "Tools")]));
        assert_eq!(state.selected_category, None);
        assert_eq!(state.upload.category_id, None);
    }

    #[test]
    fn category_name_falls_back_to_uncategorized() {
        let mut state = AppState::default();
        state.replace_categories(vec![category("1", "Tools")]);
        assert_eq!(state.category_name(Some("1")), "Tools");
        assert_eq!(state.category_name(Some("5")), UNCATEGORIZED);
        assert_eq!(state.category_name(None), UNCATEGORIZED);
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        let draft = UploadDraft {
            tags: " arrow, ui ,, nav ".to_string(),
            ..UploadDraft::default()
        };
        assert_eq!(draft.tag_list(), vec!["arrow", "ui", "nav"]);
        assert_eq!(draft.description(), None);
    }

    #[test]
    fn upload_paths_split_on_semicolon() {
        let draft = UploadDraft {
            file_path: " /tmp/a.svg ; /tmp/my icons/b.png;; ".to_string(),
            ..UploadDraft::default()
        };
        assert_eq!(draft.file_paths(), vec!["/tmp/a.svg", "/tmp/my icons/b.png"]);
        assert!(UploadDraft::default().file_paths().is_empty());
    }

    #[test]
    fn closed_editors_ignore_input() {
        let mut state = AppState::default();
        state.edit_field(Field::CategoryRename, FieldEdit::Insert('x'));
        state.edit_field(Field::IconTags, FieldEdit::Insert('x'));
        assert!(state.rename.is_none() && state.icon_edit.is_none());

        state.rename = Some(RenameDraft {
            id: "1".to_string(),
            name: "Tool".to_string(),
            error: None,
        });
        state.edit_field(Field::CategoryRename, FieldEdit::Insert('s'));
        assert_eq!(state.rename.as_ref().unwrap().name, "Tools");
    }

    #[test]
    fn rename_closes_when_category_disappears() {
        let mut state = AppState::default();
        state.replace_categories(vec![category("1", "Tools")]);
        state.rename = Some(RenameDraft {
            id: "1".to_string(),
            ..RenameDraft::default()
        });
        state.replace_categories(vec![category("2", "Arrows")]);
        assert!(state.rename.is_none());
    }

    #[test]
    fn field_edits_target_the_right_form() {
        let mut state = AppState::default();
        state.edit_field(Field::CategoryName, FieldEdit::Insert('a'));
        state.edit_field(Field::CategoryName, FieldEdit::Insert('b'));
        state.edit_field(Field::CategoryName, FieldEdit::Backspace);
        state.edit_field(Field::Password, FieldEdit::Set("pw".to_string()));
        assert_eq!(state.new_category.name, "a");
        assert_eq!(state.login.password, "pw");
        state.edit_field(Field::Password, FieldEdit::Clear);
        assert!(state.login.password.is_empty());
    }
}
