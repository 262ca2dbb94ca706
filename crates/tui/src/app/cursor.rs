//! Terminal-only selection and focus. None of this is application state:
//! it is derived against the current [`ViewTree`] after every interaction.

use crate::view::{SelectNode, SelectOption, ViewTree};

use super::state::Field;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginFocus {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadFocus {
    #[default]
    File,
    Category,
    Tags,
    Description,
}

impl UploadFocus {
    fn next(self) -> Self {
        match self {
            Self::File => Self::Category,
            Self::Category => Self::Tags,
            Self::Tags => Self::Description,
            Self::Description => Self::File,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IconEditFocus {
    #[default]
    Tags,
    Description,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoriesFocus {
    #[default]
    Name,
    List,
}

/// Transfer target chooser opened on one icon card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub icon_id: String,
    pub filename: String,
    pub options: Vec<SelectOption>,
    pub selected: usize,
}

impl Picker {
    pub fn choice(&self) -> Option<&SelectOption> {
        self.options.get(self.selected)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub icon: usize,
    pub category: usize,
    pub login: LoginFocus,
    pub upload: UploadFocus,
    pub categories: CategoriesFocus,
    pub icon_edit: IconEditFocus,
    pub picker: Option<Picker>,
}

impl Cursor {
    pub fn next_login_field(&mut self) {
        self.login = match self.login {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Username,
        };
    }

    pub fn next_upload_field(&mut self) {
        self.upload = self.upload.next();
    }

    pub fn toggle_categories_focus(&mut self) {
        self.categories = match self.categories {
            CategoriesFocus::Name => CategoriesFocus::List,
            CategoriesFocus::List => CategoriesFocus::Name,
        };
    }

    pub fn next_icon_edit_field(&mut self) {
        self.icon_edit = match self.icon_edit {
            IconEditFocus::Tags => IconEditFocus::Description,
            IconEditFocus::Description => IconEditFocus::Tags,
        };
    }

    pub fn icon_edit_field(&self) -> Field {
        match self.icon_edit {
            IconEditFocus::Tags => Field::IconTags,
            IconEditFocus::Description => Field::IconDescription,
        }
    }

    pub fn login_field(&self) -> Field {
        match self.login {
            LoginFocus::Username => Field::Username,
            LoginFocus::Password => Field::Password,
        }
    }

    /// Text field receiving key presses in the upload form, if any.
    pub fn upload_field(&self) -> Option<Field> {
        match self.upload {
            UploadFocus::File => Some(Field::UploadFile),
            UploadFocus::Tags => Some(Field::UploadTags),
            UploadFocus::Description => Some(Field::UploadDescription),
            UploadFocus::Category => None,
        }
    }

    pub fn move_icon(&mut self, delta: isize, len: usize) {
        self.icon = step(self.icon, delta, len);
    }

    pub fn move_category(&mut self, delta: isize, len: usize) {
        self.category = step(self.category, delta, len);
    }

    /// Keeps indices inside the lists that are currently rendered and drops a
    /// picker whose icon is gone or no longer movable.
    pub fn clamp(&mut self, tree: &ViewTree) {
        if tree.icon_editor.is_none() {
            self.icon_edit = IconEditFocus::Tags;
        }
        let cards = tree.icon_cards();
        self.icon = self.icon.min(cards.len().saturating_sub(1));
        self.category = self
            .category
            .min(tree.category_rows().len().saturating_sub(1));

        let keep_picker = self.picker.as_ref().is_some_and(|picker| {
            cards
                .iter()
                .any(|card| card.id == picker.icon_id && card.transfer.is_some())
        });
        if !keep_picker {
            self.picker = None;
        }
    }

    pub fn open_picker(&mut self, tree: &ViewTree) -> bool {
        let Some(card) = tree.icon_cards().get(self.icon).copied() else {
            return false;
        };
        let Some(options) = card.transfer.as_ref().filter(|options| !options.is_empty()) else {
            return false;
        };
        self.picker = Some(Picker {
            icon_id: card.id.clone(),
            filename: card.filename.clone(),
            options: options.clone(),
            selected: 0,
        });
        true
    }

    pub fn move_picker(&mut self, delta: isize) {
        if let Some(picker) = self.picker.as_mut() {
            picker.selected = step(picker.selected, delta, picker.options.len());
        }
    }
}

/// Value of the option next to the current selection of a select control.
pub fn cycle_select(select: &SelectNode, delta: isize) -> Option<&SelectOption> {
    let len = select.options.len();
    if len == 0 {
        return None;
    }
    let current = select.selected_index() as isize;
    let next = (current + delta).rem_euclid(len as isize) as usize;
    select.options.get(next)
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len as isize - 1;
    (current as isize + delta).clamp(0, max) as usize
}
