//! Declarative wiring of user controls to controller operations.
//!
//! The front end only reports *which* control fired *which* event; the
//! [`EventTable`] built at start-up decides what operation that means.

use std::collections::HashMap;

use super::state::{Field, FieldEdit, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    NavAll,
    NavCategories,
    NavUpload,
    /// Reads "Login" or "Logout" depending on the session.
    NavSession,
    Refresh,
    CategoryFilter,
    UploadCategory,
    UploadForm,
    AddCategory,
    LoginForm,
    IconDelete,
    IconTransfer,
    IconDownload,
    IconDetails,
    CategoryDelete,
    CategoryRename,
    RenameForm,
    RenameCancel,
    IconEdit,
    IconEditForm,
    IconEditCancel,
    Field(Field),
    ConfirmYes,
    ConfirmNo,
    NoticeDismiss,
    DetailClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Submit,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SwitchView(View),
    ToggleSession,
    LoadIcons,
    SetCategoryFilter,
    SetUploadCategory,
    SubmitUpload,
    SubmitCategory,
    SubmitLogin,
    DeleteIcon,
    TransferIcon,
    DownloadIcon,
    ShowIconDetails,
    CloseIconDetails,
    DeleteCategory,
    StartRename,
    SubmitRename,
    CancelRename,
    StartIconEdit,
    SubmitIconEdit,
    CancelIconEdit,
    EditField(Field),
    Confirm,
    Cancel,
    DismissNotice,
}

/// A fired control. `target` names the icon or category a per-item control
/// belongs to, `value` carries the chosen option of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub control: Control,
    pub kind: EventKind,
    pub target: Option<String>,
    pub value: Option<String>,
    pub edit: Option<FieldEdit>,
}

impl Event {
    pub fn new(control: Control, kind: EventKind) -> Self {
        Self {
            control,
            kind,
            target: None,
            value: None,
            edit: None,
        }
    }

    pub fn click(control: Control) -> Self {
        Self::new(control, EventKind::Click)
    }

    pub fn submit(control: Control) -> Self {
        Self::new(control, EventKind::Submit)
    }

    pub fn change(control: Control, value: impl Into<String>) -> Self {
        Self::new(control, EventKind::Change).value(value)
    }

    pub fn input(field: Field, edit: FieldEdit) -> Self {
        let mut event = Self::new(Control::Field(field), EventKind::Input);
        event.edit = Some(edit);
        event
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

const BINDINGS: &[(Control, EventKind, Operation)] = &[
    (Control::NavAll, EventKind::Click, Operation::SwitchView(View::All)),
    (Control::NavCategories, EventKind::Click, Operation::SwitchView(View::Categories)),
    (Control::NavUpload, EventKind::Click, Operation::SwitchView(View::Upload)),
    (Control::NavSession, EventKind::Click, Operation::ToggleSession),
    (Control::Refresh, EventKind::Click, Operation::LoadIcons),
    (Control::CategoryFilter, EventKind::Change, Operation::SetCategoryFilter),
    (Control::UploadCategory, EventKind::Change, Operation::SetUploadCategory),
    (Control::UploadForm, EventKind::Submit, Operation::SubmitUpload),
    (Control::AddCategory, EventKind::Click, Operation::SubmitCategory),
    (Control::LoginForm, EventKind::Submit, Operation::SubmitLogin),
    (Control::IconDelete, EventKind::Click, Operation::DeleteIcon),
    (Control::IconTransfer, EventKind::Change, Operation::TransferIcon),
    (Control::IconDownload, EventKind::Click, Operation::DownloadIcon),
    (Control::IconDetails, EventKind::Click, Operation::ShowIconDetails),
    (Control::DetailClose, EventKind::Click, Operation::CloseIconDetails),
    (Control::CategoryDelete, EventKind::Click, Operation::DeleteCategory),
    (Control::CategoryRename, EventKind::Click, Operation::StartRename),
    (Control::RenameForm, EventKind::Submit, Operation::SubmitRename),
    (Control::RenameCancel, EventKind::Click, Operation::CancelRename),
    (Control::IconEdit, EventKind::Click, Operation::StartIconEdit),
    (Control::IconEditForm, EventKind::Submit, Operation::SubmitIconEdit),
    (Control::IconEditCancel, EventKind::Click, Operation::CancelIconEdit),
    (Control::ConfirmYes, EventKind::Click, Operation::Confirm),
    (Control::ConfirmNo, EventKind::Click, Operation::Cancel),
    (Control::NoticeDismiss, EventKind::Click, Operation::DismissNotice),
];

#[derive(Debug, Clone)]
pub struct EventTable {
    bindings: HashMap<(Control, EventKind), Operation>,
}

impl EventTable {
    pub fn new() -> Self {
        let mut bindings: HashMap<_, _> = BINDINGS
            .iter()
            .map(|(control, kind, operation)| ((*control, *kind), *operation))
            .collect();
        for field in Field::ALL {
            bindings.insert(
                (Control::Field(field), EventKind::Input),
                Operation::EditField(field),
            );
        }
        Self { bindings }
    }

    pub fn resolve(&self, control: Control, kind: EventKind) -> Option<Operation> {
        self.bindings.get(&(control, kind)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_controls_switch_views() {
        let table = EventTable::new();
        assert_eq!(
            table.resolve(Control::NavAll, EventKind::Click),
            Some(Operation::SwitchView(View::All))
        );
        assert_eq!(
            table.resolve(Control::NavUpload, EventKind::Click),
            Some(Operation::SwitchView(View::Upload))
        );
        assert_eq!(
            table.resolve(Control::NavSession, EventKind::Click),
            Some(Operation::ToggleSession)
        );
    }

    #[test]
    fn editors_open_on_click_and_submit_as_forms() {
        let table = EventTable::new();
        assert_eq!(
            table.resolve(Control::CategoryRename, EventKind::Click),
            Some(Operation::StartRename)
        );
        assert_eq!(
            table.resolve(Control::RenameForm, EventKind::Submit),
            Some(Operation::SubmitRename)
        );
        assert_eq!(
            table.resolve(Control::IconEditForm, EventKind::Submit),
            Some(Operation::SubmitIconEdit)
        );
        assert_eq!(table.resolve(Control::IconEditForm, EventKind::Click), None);
    }

    #[test]
    fn wrong_event_kind_is_unbound() {
        let table = EventTable::new();
        assert_eq!(table.resolve(Control::CategoryFilter, EventKind::Click), None);
        assert_eq!(table.resolve(Control::LoginForm, EventKind::Click), None);
    }

    #[test]
    fn every_field_accepts_input() {
        let table = EventTable::new();
        for field in Field::ALL {
            assert_eq!(
                table.resolve(Control::Field(field), EventKind::Input),
                Some(Operation::EditField(field))
            );
        }
        assert_eq!(table.len(), BINDINGS.len() + Field::ALL.len());
    }
}
