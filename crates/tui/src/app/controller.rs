//! The view-state controller.
//!
//! Every public operation follows the same shape: check preconditions, call
//! the transport, apply a state transition, then [`Controller::commit`] the
//! new projection. Nothing mutates [`AppState`] from outside this type.
//!
//! Each committed projection is also published on a watch channel, so a
//! front end can redraw while an operation is still waiting on the server.

use std::path::{Path, PathBuf};

use api_types::{category::Category, icon::Icon, icon::IconUpdate};
use chrono::Local;
use tokio::sync::watch;

use crate::{
    client::{Api, ApiError, IconFile, Transport, UploadForm},
    view::{self, ViewTree},
};

use super::{
    events::{Event, EventTable, Operation},
    state::{
        AppState, Field, FieldEdit, IconEditDraft, NoticeLevel, PendingConfirm, RenameDraft, View,
        split_tags,
    },
};

const LOGIN_REQUIRED: &str = "Please log in first";
const NAME_REQUIRED: &str = "Category name is required";

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub username: String,
    pub download_dir: PathBuf,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            download_dir: PathBuf::from("."),
        }
    }
}

/// Handle for one icon list fetch. Only the most recently issued ticket may
/// write its result into the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconsTicket {
    seq: u64,
    category_id: Option<String>,
}

impl IconsTicket {
    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoriesTicket {
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Categories were applied and the active filter had to be dropped.
    FilterReset,
    Failed,
    /// A newer fetch was issued meanwhile; the result was discarded.
    Stale,
}

/// Upload request built from the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconUpload {
    pub file: IconFile,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl From<IconUpload> for UploadForm {
    fn from(upload: IconUpload) -> Self {
        Self {
            file: upload.file,
            category_id: upload.category_id,
            tags: upload.tags,
            description: upload.description,
        }
    }
}

pub struct Controller<T> {
    api: Api<T>,
    state: AppState,
    tree: ViewTree,
    updates: watch::Sender<ViewTree>,
    events: EventTable,
    download_dir: PathBuf,
    icons_seq: u64,
    categories_seq: u64,
}

impl<T: Transport> Controller<T> {
    pub fn new(transport: T, settings: ControllerSettings) -> Self {
        let state = AppState::new(&settings.username);
        let tree = view::render(&state);
        let (updates, _) = watch::channel(tree.clone());
        Self {
            api: Api::new(transport),
            state,
            tree,
            updates,
            events: EventTable::new(),
            download_dir: settings.download_dir,
            icons_seq: 0,
            categories_seq: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The projection of the current state.
    pub fn view(&self) -> &ViewTree {
        &self.tree
    }

    pub fn api(&self) -> &Api<T> {
        &self.api
    }

    /// Receives every projection committed from now on.
    pub fn subscribe(&self) -> watch::Receiver<ViewTree> {
        self.updates.subscribe()
    }

    fn commit(&mut self) {
        self.tree = view::render(&self.state);
        if self.updates.receiver_count() > 0 {
            self.updates.send_replace(self.tree.clone());
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.state.notify(level, message);
        self.commit();
    }

    fn require_login(&mut self, action: &str) -> bool {
        if self.state.logged_in {
            return true;
        }
        tracing::warn!(action, "rejected while logged out");
        self.notify(NoticeLevel::Error, LOGIN_REQUIRED);
        false
    }

    /// Session status, then categories, then icons. Category rendering
    /// depends on the session, icons depend on category names.
    pub async fn init(&mut self) {
        match self.api.auth_status().await {
            Ok(status) => {
                self.state.logged_in = status.logged_in;
                tracing::info!(logged_in = status.logged_in, "session status");
            }
            Err(err) => tracing::warn!("session status unavailable: {err}"),
        }
        self.commit();

        self.load_categories().await;
        self.load_icons().await;
    }

    pub fn switch_view(&mut self, view: View) {
        self.state.select_view(view);
        self.commit();
    }

    pub async fn set_category_filter(&mut self, category_id: Option<String>) {
        self.state.set_filter(category_id);
        self.commit();
        self.load_icons().await;
    }

    pub fn begin_icon_load(&mut self) -> IconsTicket {
        self.icons_seq += 1;
        self.state.start_icon_load();
        self.commit();
        IconsTicket {
            seq: self.icons_seq,
            category_id: self.state.selected_category.clone(),
        }
    }

    pub fn finish_icon_load(
        &mut self,
        ticket: IconsTicket,
        result: Result<Vec<Icon>, ApiError>,
    ) -> LoadOutcome {
        if ticket.seq != self.icons_seq {
            tracing::debug!(seq = ticket.seq, latest = self.icons_seq, "stale icon list dropped");
            return LoadOutcome::Stale;
        }

        let outcome = match result {
            Ok(icons) => {
                tracing::debug!(count = icons.len(), "icons loaded");
                self.state.apply_icons(icons, Local::now());
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!("failed to load icons: {err}");
                self.state
                    .fail_icons(format!("Failed to load icons: {}", err.message()));
                LoadOutcome::Failed
            }
        };
        self.commit();
        outcome
    }

    pub async fn load_icons(&mut self) -> LoadOutcome {
        let ticket = self.begin_icon_load();
        let result = self.api.icons(ticket.category_id()).await;
        self.finish_icon_load(ticket, result)
    }

    pub fn begin_category_load(&mut self) -> CategoriesTicket {
        self.categories_seq += 1;
        CategoriesTicket {
            seq: self.categories_seq,
        }
    }

    pub fn finish_category_load(
        &mut self,
        ticket: CategoriesTicket,
        result: Result<Vec<Category>, ApiError>,
    ) -> LoadOutcome {
        if ticket.seq != self.categories_seq {
            tracing::debug!(seq = ticket.seq, latest = self.categories_seq, "stale category list dropped");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(categories) => {
                tracing::debug!(count = categories.len(), "categories loaded");
                let reset = self.state.replace_categories(categories);
                self.commit();
                if reset {
                    tracing::info!("selected category is gone, filter reset");
                    LoadOutcome::FilterReset
                } else {
                    LoadOutcome::Applied
                }
            }
            Err(err) => {
                tracing::warn!("failed to load categories: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to load categories: {}", err.message()),
                );
                LoadOutcome::Failed
            }
        }
    }

    pub async fn load_categories(&mut self) -> LoadOutcome {
        let ticket = self.begin_category_load();
        let result = self.api.categories().await;
        let outcome = self.finish_category_load(ticket, result);
        if outcome == LoadOutcome::FilterReset {
            self.load_icons().await;
        }
        outcome
    }

    pub async fn create_category(&mut self, name: &str) {
        if !self.require_login("create category") {
            return;
        }
        let name = name.trim();
        if name.is_empty() {
            self.state.new_category.error = Some(NAME_REQUIRED.to_string());
            self.commit();
            return;
        }

        match self.api.create_category(name).await {
            Ok(()) => {
                tracing::info!(%name, "category created");
                self.state.new_category = Default::default();
                self.notify(NoticeLevel::Info, format!("Category \"{name}\" created"));
                self.load_categories().await;
            }
            Err(err) => {
                tracing::warn!(%name, "failed to create category: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to create category: {}", err.message()),
                );
            }
        }
    }

    /// Opens the inline rename editor on a category row.
    pub fn start_rename(&mut self, category_id: &str) {
        if !self.require_login("rename category") {
            return;
        }
        let Some(category) = self.state.category(category_id) else {
            tracing::debug!(%category_id, "rename of unknown category ignored");
            return;
        };
        self.state.rename = Some(RenameDraft {
            id: category.id.clone(),
            name: category.name.clone(),
            error: None,
        });
        self.commit();
    }

    pub fn cancel_rename(&mut self) {
        if self.state.rename.take().is_some() {
            self.commit();
        }
    }

    pub async fn rename_category(&mut self, category_id: &str, name: &str) {
        if !self.require_login("rename category") {
            return;
        }
        let name = name.trim();
        if name.is_empty() {
            match self.state.rename.as_mut() {
                Some(draft) if draft.id == category_id => {
                    draft.error = Some(NAME_REQUIRED.to_string());
                }
                _ => {
                    self.state.rename = Some(RenameDraft {
                        id: category_id.to_string(),
                        name: String::new(),
                        error: Some(NAME_REQUIRED.to_string()),
                    });
                }
            }
            self.commit();
            return;
        }

        match self.api.rename_category(category_id, name).await {
            Ok(()) => {
                tracing::info!(%category_id, %name, "category renamed");
                self.state.rename = None;
                self.notify(NoticeLevel::Info, format!("Category renamed to \"{name}\""));
                self.load_categories().await;
            }
            Err(err) => {
                tracing::warn!(%category_id, %name, "failed to rename category: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to rename category: {}", err.message()),
                );
            }
        }
    }

    /// Asks for confirmation; the deletion itself runs on [`Self::confirm`].
    pub fn delete_category(&mut self, category_id: &str) {
        if !self.require_login("delete category") {
            return;
        }
        let name = self
            .state
            .category(category_id)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| category_id.to_string());
        self.state.pending = Some(PendingConfirm::DeleteCategory {
            id: category_id.to_string(),
            name,
        });
        self.commit();
    }

    async fn perform_delete_category(&mut self, category_id: &str) {
        if !self.require_login("delete category") {
            return;
        }
        let was_selected = self.state.selected_category.as_deref() == Some(category_id);

        match self.api.delete_category(category_id).await {
            Ok(()) => {
                tracing::info!(%category_id, "category deleted");
                self.notify(NoticeLevel::Info, "Category deleted");
                self.load_categories().await;
                // Covers a failed category reload, which keeps the stale cache.
                if was_selected && self.state.selected_category.as_deref() == Some(category_id) {
                    self.state.set_filter(None);
                    self.commit();
                    self.load_icons().await;
                }
            }
            Err(err) => {
                tracing::warn!(%category_id, "failed to delete category: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to delete category: {}", err.message()),
                );
            }
        }
    }

    pub async fn upload_icon(&mut self, upload: IconUpload) {
        if !self.require_login("upload icon") {
            return;
        }
        let filename = upload.file.file_name.clone();

        match self.api.upload_icon(upload.into()).await {
            Ok(()) => {
                tracing::info!(%filename, "icon uploaded");
                self.state.upload = Default::default();
                self.notify(NoticeLevel::Info, format!("Uploaded \"{filename}\""));
                self.load_icons().await;
            }
            Err(err) => {
                tracing::warn!(%filename, "failed to upload icon: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to upload icon: {}", err.message()),
                );
            }
        }
    }

    /// Uploads several files with the same metadata, one request each. Files
    /// that fail do not stop the rest; the form is only reset when every
    /// file made it.
    pub async fn upload_icons(&mut self, uploads: Vec<IconUpload>) {
        if !self.require_login("upload icons") {
            return;
        }
        if uploads.is_empty() {
            return;
        }

        let total = uploads.len();
        let mut failures = Vec::new();
        for upload in uploads {
            let filename = upload.file.file_name.clone();
            match self.api.upload_icon(upload.into()).await {
                Ok(()) => tracing::info!(%filename, "icon uploaded"),
                Err(err) => {
                    tracing::warn!(%filename, "failed to upload icon: {err}");
                    failures.push(format!("{filename}: {}", err.message()));
                }
            }
        }

        let uploaded = total - failures.len();
        if failures.is_empty() {
            self.state.upload = Default::default();
            self.notify(NoticeLevel::Info, format!("Uploaded {uploaded} icons"));
        } else {
            self.notify(
                NoticeLevel::Error,
                format!(
                    "Uploaded {uploaded} of {total} icons. Failed: {}",
                    failures.join("; ")
                ),
            );
        }
        if uploaded > 0 {
            self.load_icons().await;
        }
    }

    /// Asks for confirmation; the deletion itself runs on [`Self::confirm`].
    pub fn delete_icon(&mut self, icon_id: &str) {
        if !self.require_login("delete icon") {
            return;
        }
        let filename = self
            .state
            .icons
            .find(icon_id)
            .map(|icon| icon.filename.clone())
            .unwrap_or_else(|| icon_id.to_string());
        self.state.pending = Some(PendingConfirm::DeleteIcon {
            id: icon_id.to_string(),
            filename,
        });
        self.commit();
    }

    async fn perform_delete_icon(&mut self, icon_id: &str) {
        if !self.require_login("delete icon") {
            return;
        }
        match self.api.delete_icon(icon_id).await {
            Ok(()) => {
                tracing::info!(%icon_id, "icon deleted");
                self.load_icons().await;
            }
            Err(err) => {
                tracing::warn!(%icon_id, "failed to delete icon: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to delete icon: {}", err.message()),
                );
            }
        }
    }

    pub async fn transfer_icon(&mut self, icon_id: &str, category_id: &str) {
        if !self.require_login("transfer icon") {
            return;
        }
        if category_id.is_empty() {
            return;
        }

        let update = IconUpdate::move_to(category_id);
        match self.api.update_icon(icon_id, &update).await {
            Ok(()) => {
                tracing::info!(%icon_id, %category_id, "icon transferred");
                self.load_icons().await;
            }
            Err(err) => {
                tracing::warn!(%icon_id, %category_id, "failed to transfer icon: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to move icon: {}", err.message()),
                );
            }
        }
    }

    /// Opens the tag and description editor for an icon in the list or the
    /// detail popup.
    pub fn start_icon_edit(&mut self, icon_id: &str) {
        if !self.require_login("edit icon") {
            return;
        }
        let icon = self
            .state
            .icons
            .find(icon_id)
            .or_else(|| self.state.detail.as_ref().filter(|icon| icon.id == icon_id));
        let Some(icon) = icon else {
            tracing::debug!(%icon_id, "edit of unknown icon ignored");
            return;
        };
        self.state.icon_edit = Some(IconEditDraft::for_icon(icon));
        self.commit();
    }

    pub fn cancel_icon_edit(&mut self) {
        if self.state.icon_edit.take().is_some() {
            self.commit();
        }
    }

    /// Updates the metadata of an icon. Only the fields given are sent, an
    /// empty description clears it.
    pub async fn edit_icon(
        &mut self,
        icon_id: &str,
        tags: Option<Vec<String>>,
        description: Option<String>,
    ) {
        if !self.require_login("edit icon") {
            return;
        }
        let update = IconUpdate {
            tags,
            description,
            ..IconUpdate::default()
        };
        if update.is_empty() {
            return;
        }

        match self.api.update_icon(icon_id, &update).await {
            Ok(()) => {
                tracing::info!(%icon_id, "icon updated");
                self.state.icon_edit = None;
                self.notify(NoticeLevel::Info, "Icon updated");
                self.load_icons().await;
                self.refresh_detail(icon_id).await;
            }
            Err(err) => {
                tracing::warn!(%icon_id, "failed to update icon: {err}");
                let message = format!("Failed to update icon: {}", err.message());
                match self.state.icon_edit.as_mut() {
                    Some(draft) if draft.id == icon_id => {
                        draft.error = Some(message);
                        self.commit();
                    }
                    _ => self.notify(NoticeLevel::Error, message),
                }
            }
        }
    }

    async fn refresh_detail(&mut self, icon_id: &str) {
        if self.state.detail.as_ref().is_none_or(|icon| icon.id != icon_id) {
            return;
        }
        let icon = match self.state.icons.find(icon_id).cloned() {
            Some(icon) => Ok(icon),
            None => self.api.icon(icon_id).await,
        };
        match icon {
            Ok(icon) => self.state.detail = Some(icon),
            Err(err) => {
                tracing::debug!(%icon_id, "detail refresh failed: {err}");
                self.state.detail = None;
            }
        }
        self.commit();
    }

    pub async fn login(&mut self, username: &str, password: &str) {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.state.login.error = Some("Enter username and password".to_string());
            self.commit();
            return;
        }

        match self.api.login(username, password).await {
            Ok(()) => {
                tracing::info!(%username, "logged in");
                self.state.apply_login();
                self.commit();
            }
            Err(err) => {
                tracing::warn!(%username, "login failed: {err}");
                let message = match err.status() {
                    Some(401) => "Invalid username or password".to_string(),
                    _ => format!("Login failed: {}", err.message()),
                };
                self.state.login.error = Some(message);
                self.commit();
            }
        }
    }

    pub async fn logout(&mut self) {
        if !self.state.logged_in {
            tracing::debug!("logout ignored, no session");
            return;
        }
        match self.api.logout().await {
            Ok(()) => {
                tracing::info!("logged out");
                self.state.apply_logout();
                self.commit();
            }
            Err(err) => tracing::warn!("logout failed: {err}"),
        }
    }

    /// The session entry of the navigation: logout when logged in, otherwise
    /// open the login view.
    pub async fn toggle_session(&mut self) {
        if self.state.logged_in {
            self.logout().await;
        } else {
            self.switch_view(View::Login);
        }
    }

    pub async fn confirm(&mut self) {
        let Some(pending) = self.state.pending.take() else {
            return;
        };
        self.commit();
        match pending {
            PendingConfirm::DeleteIcon { id, .. } => self.perform_delete_icon(&id).await,
            PendingConfirm::DeleteCategory { id, .. } => self.perform_delete_category(&id).await,
        }
    }

    pub fn cancel(&mut self) {
        if self.state.pending.take().is_some() {
            self.commit();
        }
    }

    pub fn dismiss_notice(&mut self) {
        if self.state.dismiss_notice().is_some() {
            self.commit();
        }
    }

    pub async fn show_icon_details(&mut self, icon_id: &str) {
        match self.api.icon(icon_id).await {
            Ok(icon) => {
                self.state.detail = Some(icon);
                self.commit();
            }
            Err(err) => {
                tracing::warn!(%icon_id, "failed to load icon: {err}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to load icon: {}", err.message()),
                );
            }
        }
    }

    pub fn close_icon_details(&mut self) {
        if self.state.detail.take().is_some() {
            self.commit();
        }
    }

    /// Saves the icon content as `<download_dir>/<filename>`.
    pub async fn download_icon(&mut self, icon_id: &str) {
        let filename = match self.state.icons.find(icon_id) {
            Some(icon) => icon.filename.clone(),
            None => match self.api.icon(icon_id).await {
                Ok(icon) => icon.filename,
                Err(err) => {
                    self.notify(
                        NoticeLevel::Error,
                        format!("Failed to download icon: {}", err.message()),
                    );
                    return;
                }
            },
        };

        let target = self.download_dir.join(safe_file_name(&filename, icon_id));
        let result = match self.api.download_icon(icon_id).await {
            Ok(bytes) => write_file(&target, &bytes)
                .await
                .map_err(|err| format!("cannot write {}: {err}", target.display())),
            Err(err) => Err(err.message()),
        };

        match result {
            Ok(()) => {
                tracing::info!(%icon_id, path = %target.display(), "icon downloaded");
                self.notify(NoticeLevel::Info, format!("Saved {}", target.display()));
            }
            Err(message) => {
                tracing::warn!(%icon_id, "download failed: {message}");
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to download icon: {message}"),
                );
            }
        }
    }

    pub fn edit_field(&mut self, field: Field, edit: FieldEdit) {
        self.state.edit_field(field, edit);
        self.commit();
    }

    pub fn set_upload_category(&mut self, category_id: Option<String>) {
        self.state.set_upload_category(category_id);
        self.commit();
    }

    pub async fn submit_login_form(&mut self) {
        let username = self.state.login.username.clone();
        let password = self.state.login.password.clone();
        self.login(&username, &password).await;
    }

    pub async fn submit_category_form(&mut self) {
        let name = self.state.new_category.name.clone();
        self.create_category(&name).await;
    }

    pub async fn submit_rename_form(&mut self) {
        let Some(draft) = self.state.rename.clone() else {
            return;
        };
        self.rename_category(&draft.id, &draft.name).await;
    }

    pub async fn submit_icon_edit_form(&mut self) {
        let Some(draft) = self.state.icon_edit.clone() else {
            return;
        };
        let description = draft.description.trim().to_string();
        self.edit_icon(&draft.id, Some(split_tags(&draft.tags)), Some(description))
            .await;
    }

    /// Reads every chosen file, then uploads them with the form metadata.
    /// Nothing is sent when one of the files cannot be read.
    pub async fn submit_upload_form(&mut self) {
        if !self.require_login("upload icon") {
            return;
        }
        let paths = self.state.upload.file_paths();
        if paths.is_empty() {
            self.state.upload.error = Some("Choose a file to upload".to_string());
            self.commit();
            return;
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match read_icon_file(&path).await {
                Ok(file) => files.push(file),
                Err(err) => {
                    tracing::warn!(%path, "cannot read upload: {err}");
                    self.state.upload.error = Some(format!("Cannot read {path}: {err}"));
                    self.commit();
                    return;
                }
            }
        }

        self.state.upload.error = None;
        let draft = &self.state.upload;
        let mut uploads: Vec<IconUpload> = files
            .into_iter()
            .map(|file| IconUpload {
                file,
                category_id: draft.category_id.clone(),
                tags: draft.tag_list(),
                description: draft.description(),
            })
            .collect();

        if uploads.len() > 1 {
            self.upload_icons(uploads).await;
        } else if let Some(upload) = uploads.pop() {
            self.upload_icon(upload).await;
        }
    }

    /// Runs the operation bound to `event` in the event table.
    pub async fn dispatch(&mut self, event: Event) {
        let Some(operation) = self.events.resolve(event.control, event.kind) else {
            tracing::debug!(?event, "no binding");
            return;
        };

        match operation {
            Operation::SwitchView(view) => self.switch_view(view),
            Operation::ToggleSession => self.toggle_session().await,
            Operation::LoadIcons => {
                self.load_icons().await;
            }
            Operation::SetCategoryFilter => self.set_category_filter(event.value).await,
            Operation::SetUploadCategory => self.set_upload_category(event.value),
            Operation::SubmitUpload => self.submit_upload_form().await,
            Operation::SubmitCategory => self.submit_category_form().await,
            Operation::SubmitLogin => self.submit_login_form().await,
            Operation::SubmitRename => self.submit_rename_form().await,
            Operation::CancelRename => self.cancel_rename(),
            Operation::SubmitIconEdit => self.submit_icon_edit_form().await,
            Operation::CancelIconEdit => self.cancel_icon_edit(),
            Operation::Confirm => self.confirm().await,
            Operation::Cancel => self.cancel(),
            Operation::DismissNotice => self.dismiss_notice(),
            Operation::CloseIconDetails => self.close_icon_details(),
            Operation::EditField(field) => {
                if let Some(edit) = event.edit {
                    self.edit_field(field, edit);
                }
            }
            Operation::DeleteIcon
            | Operation::TransferIcon
            | Operation::DownloadIcon
            | Operation::ShowIconDetails
            | Operation::StartIconEdit
            | Operation::DeleteCategory
            | Operation::StartRename => {
                let Some(target) = event.target else {
                    tracing::debug!(?operation, "event without target");
                    return;
                };
                match operation {
                    Operation::DeleteIcon => self.delete_icon(&target),
                    Operation::TransferIcon => {
                        let category_id = event.value.unwrap_or_default();
                        self.transfer_icon(&target, &category_id).await;
                    }
                    Operation::DownloadIcon => self.download_icon(&target).await,
                    Operation::ShowIconDetails => self.show_icon_details(&target).await,
                    Operation::StartIconEdit => self.start_icon_edit(&target),
                    Operation::StartRename => self.start_rename(&target),
                    _ => self.delete_category(&target),
                }
            }
        }
    }
}

/// File name component of a server-provided name, so downloads never escape
/// the download directory.
fn safe_file_name(filename: &str, icon_id: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty() && name != "..")
        .unwrap_or_else(|| format!("icon-{icon_id}"))
}

async fn read_icon_file(path: &str) -> std::io::Result<IconFile> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok(IconFile { file_name, bytes })
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::safe_file_name;

    #[test]
    fn download_names_stay_in_directory() {
        assert_eq!(safe_file_name("arrow.svg", "1"), "arrow.svg");
        assert_eq!(safe_file_name("../../etc/passwd", "1"), "passwd");
        assert_eq!(safe_file_name("..", "4"), "icon-4");
        assert_eq!(safe_file_name("", "5"), "icon-5");
    }
}
