//! Pure projection of [`AppState`] into a description of what is on screen.
//!
//! Nothing here performs IO or knows about the terminal. The front end draws
//! a [`ViewTree`]; tests inspect it directly.

use api_types::icon::Icon;

use crate::{
    app::{
        events::Control,
        state::{AppState, Field, IconEditDraft, IconList, Notice, UNCATEGORIZED, View},
    },
    client::icon_file_path,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTree {
    pub nav: Vec<NavItem>,
    /// One section per [`View`], in [`View::ALL`] order.
    pub sections: Vec<Section>,
    pub status: StatusLine,
    pub detail: Option<IconDetail>,
    pub icon_editor: Option<IconEditor>,
    pub dialog: Option<Dialog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub control: Control,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub view: View,
    pub visible: bool,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Select(SelectNode),
    Button(ButtonNode),
    Field(FieldNode),
    InlineError(String),
    Placeholder(Placeholder),
    Icon(IconCard),
    Category(CategoryRow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Empty for the "none" option.
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectNode {
    pub control: Control,
    pub label: String,
    pub options: Vec<SelectOption>,
    pub selected: String,
}

impl SelectNode {
    pub fn selected_index(&self) -> usize {
        self.options
            .iter()
            .position(|option| option.value == self.selected)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonNode {
    pub control: Control,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub field: Field,
    pub label: String,
    /// Already masked for secret fields.
    pub value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Loading,
    Empty,
    Error,
    LoginPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCard {
    pub id: String,
    pub filename: String,
    pub preview: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Download reference; always present.
    pub download: String,
    pub delete: bool,
    /// Tags and description can be edited.
    pub edit: bool,
    /// Transfer targets, excluding the icon's current category. `None` while
    /// logged out.
    pub transfer: Option<Vec<SelectOption>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub icon_count: Option<u64>,
    pub deletable: bool,
    pub renamable: bool,
    /// Inline editor, present while this row is being renamed.
    pub rename: Option<FieldNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDetail {
    pub id: String,
    pub filename: String,
    pub preview: String,
    pub category: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEditor {
    pub id: String,
    pub filename: String,
    pub tags: FieldNode,
    pub description: FieldNode,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Confirm { prompt: String },
    Notice(Notice),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub session: String,
    pub filter: String,
    pub refreshed: Option<String>,
}

impl ViewTree {
    pub fn section(&self, view: View) -> Option<&Section> {
        self.sections.iter().find(|section| section.view == view)
    }

    pub fn visible_sections(&self) -> Vec<View> {
        self.sections
            .iter()
            .filter(|section| section.visible)
            .map(|section| section.view)
            .collect()
    }

    fn nodes(&self, view: View) -> impl Iterator<Item = &Node> {
        self.section(view)
            .into_iter()
            .flat_map(|section| section.nodes.iter())
    }

    pub fn icon_cards(&self) -> Vec<&IconCard> {
        self.nodes(View::All)
            .filter_map(|node| match node {
                Node::Icon(card) => Some(card),
                _ => None,
            })
            .collect()
    }

    pub fn category_rows(&self) -> Vec<&CategoryRow> {
        self.nodes(View::Categories)
            .filter_map(|node| match node {
                Node::Category(row) => Some(row),
                _ => None,
            })
            .collect()
    }

    pub fn placeholders(&self, view: View) -> Vec<&Placeholder> {
        self.nodes(view)
            .filter_map(|node| match node {
                Node::Placeholder(placeholder) => Some(placeholder),
                _ => None,
            })
            .collect()
    }

    pub fn select(&self, control: Control) -> Option<&SelectNode> {
        self.sections
            .iter()
            .flat_map(|section| section.nodes.iter())
            .find_map(|node| match node {
                Node::Select(select) if select.control == control => Some(select),
                _ => None,
            })
    }

    pub fn fields(&self, view: View) -> Vec<&FieldNode> {
        self.nodes(view)
            .filter_map(|node| match node {
                Node::Field(field) => Some(field),
                _ => None,
            })
            .collect()
    }

    pub fn inline_errors(&self, view: View) -> Vec<&str> {
        self.nodes(view)
            .filter_map(|node| match node {
                Node::InlineError(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn nav_item(&self, control: Control) -> Option<&NavItem> {
        self.nav.iter().find(|item| item.control == control)
    }
}

pub fn render(state: &AppState) -> ViewTree {
    let sections = View::ALL
        .into_iter()
        .map(|view| Section {
            view,
            visible: view == state.view,
            nodes: match view {
                View::All => render_icons(state),
                View::Categories => render_categories(state),
                View::Upload => render_upload(state),
                View::Login => render_login(state),
            },
        })
        .collect();

    ViewTree {
        nav: render_nav(state),
        sections,
        status: render_status(state),
        detail: state.detail.as_ref().map(|icon| render_detail(state, icon)),
        icon_editor: state
            .icon_edit
            .as_ref()
            .filter(|_| state.logged_in)
            .map(render_icon_editor),
        dialog: render_dialog(state),
    }
}

fn render_nav(state: &AppState) -> Vec<NavItem> {
    let mut nav = vec![NavItem {
        control: Control::NavAll,
        label: View::All.label().to_string(),
        active: state.view == View::All,
    }];
    if state.logged_in {
        nav.push(NavItem {
            control: Control::NavCategories,
            label: View::Categories.label().to_string(),
            active: state.view == View::Categories,
        });
        nav.push(NavItem {
            control: Control::NavUpload,
            label: View::Upload.label().to_string(),
            active: state.view == View::Upload,
        });
    }
    nav.push(NavItem {
        control: Control::NavSession,
        label: if state.logged_in { "Logout" } else { "Login" }.to_string(),
        active: state.view == View::Login,
    });
    nav
}

fn category_options(state: &AppState, none_label: &str) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", none_label))
        .chain(
            state
                .categories
                .iter()
                .map(|category| SelectOption::new(category.id.as_str(), category.name.as_str())),
        )
        .collect()
}

fn render_icons(state: &AppState) -> Vec<Node> {
    let mut nodes = vec![
        Node::Select(SelectNode {
            control: Control::CategoryFilter,
            label: "Category".to_string(),
            options: category_options(state, "All categories"),
            selected: state.selected_category.clone().unwrap_or_default(),
        }),
        Node::Button(ButtonNode {
            control: Control::Refresh,
            label: "Refresh".to_string(),
        }),
    ];

    match &state.icons {
        IconList::Loading => nodes.push(placeholder(PlaceholderKind::Loading, "Loading icons...")),
        IconList::Failed(message) => nodes.push(placeholder(PlaceholderKind::Error, message)),
        IconList::Loaded(icons) if icons.is_empty() => {
            nodes.push(placeholder(PlaceholderKind::Empty, "No icons yet"))
        }
        IconList::Loaded(icons) => {
            nodes.extend(icons.iter().map(|icon| Node::Icon(icon_card(state, icon))))
        }
    }
    nodes
}

fn icon_card(state: &AppState, icon: &Icon) -> IconCard {
    let file = icon_file_path(&icon.id);
    let transfer = state.logged_in.then(|| {
        state
            .categories
            .iter()
            .filter(|category| icon.category_id.as_deref() != Some(category.id.as_str()))
            .map(|category| SelectOption::new(category.id.as_str(), category.name.as_str()))
            .collect()
    });

    IconCard {
        id: icon.id.clone(),
        filename: icon.filename.clone(),
        preview: file.clone(),
        category: state.category_name(icon.category_id.as_deref()).to_string(),
        tags: icon.tags.clone(),
        download: file,
        delete: state.logged_in,
        edit: state.logged_in,
        transfer,
    }
}

fn render_categories(state: &AppState) -> Vec<Node> {
    if !state.logged_in {
        return vec![placeholder(
            PlaceholderKind::LoginPrompt,
            "Log in to manage categories",
        )];
    }

    let mut nodes = vec![
        field(
            Field::CategoryName,
            &state.new_category.name,
            state.new_category.error.clone(),
        ),
        Node::Button(ButtonNode {
            control: Control::AddCategory,
            label: "Add category".to_string(),
        }),
    ];

    if state.categories.is_empty() {
        nodes.push(placeholder(PlaceholderKind::Empty, "No categories yet"));
    }
    nodes.extend(state.categories.iter().map(|category| {
        let rename = state
            .rename
            .as_ref()
            .filter(|draft| draft.id == category.id)
            .map(|draft| FieldNode {
                field: Field::CategoryRename,
                label: Field::CategoryRename.label().to_string(),
                value: draft.name.clone(),
                error: draft.error.clone(),
            });
        Node::Category(CategoryRow {
            id: category.id.clone(),
            name: category.name.clone(),
            icon_count: category.icon_count,
            deletable: true,
            renamable: true,
            rename,
        })
    }));
    nodes
}

fn render_upload(state: &AppState) -> Vec<Node> {
    let draft = &state.upload;
    vec![
        field(Field::UploadFile, &draft.file_path, draft.error.clone()),
        Node::Select(SelectNode {
            control: Control::UploadCategory,
            label: "Category".to_string(),
            options: category_options(state, UNCATEGORIZED),
            selected: draft.category_id.clone().unwrap_or_default(),
        }),
        field(Field::UploadTags, &draft.tags, None),
        field(Field::UploadDescription, &draft.description, None),
        Node::Button(ButtonNode {
            control: Control::UploadForm,
            label: "Upload".to_string(),
        }),
    ]
}

fn render_login(state: &AppState) -> Vec<Node> {
    let form = &state.login;
    let mut nodes = vec![
        field(Field::Username, &form.username, None),
        field(Field::Password, &mask(&form.password), None),
    ];
    if let Some(error) = &form.error {
        nodes.push(Node::InlineError(error.clone()));
    }
    nodes.push(Node::Button(ButtonNode {
        control: Control::LoginForm,
        label: "Log in".to_string(),
    }));
    nodes
}

fn render_status(state: &AppState) -> StatusLine {
    let filter = state
        .selected_category
        .as_deref()
        .map(|id| state.category_name(Some(id)).to_string())
        .unwrap_or_else(|| "All categories".to_string());

    StatusLine {
        session: if state.logged_in { "admin" } else { "guest" }.to_string(),
        filter,
        refreshed: state
            .last_refresh
            .map(|at| at.format("%H:%M:%S").to_string()),
    }
}

fn render_detail(state: &AppState, icon: &Icon) -> IconDetail {
    IconDetail {
        id: icon.id.clone(),
        filename: icon.filename.clone(),
        preview: icon_file_path(&icon.id),
        category: state.category_name(icon.category_id.as_deref()).to_string(),
        tags: icon.tags.clone(),
        description: icon.description.clone().filter(|text| !text.is_empty()),
    }
}

fn render_icon_editor(draft: &IconEditDraft) -> IconEditor {
    let field_node = |field: Field, value: &str| FieldNode {
        field,
        label: field.label().to_string(),
        value: value.to_string(),
        error: None,
    };
    IconEditor {
        id: draft.id.clone(),
        filename: draft.filename.clone(),
        tags: field_node(Field::IconTags, &draft.tags),
        description: field_node(Field::IconDescription, &draft.description),
        error: draft.error.clone(),
    }
}

fn render_dialog(state: &AppState) -> Option<Dialog> {
    if let Some(pending) = &state.pending {
        return Some(Dialog::Confirm {
            prompt: pending.prompt(),
        });
    }
    state.notices.front().cloned().map(Dialog::Notice)
}

fn placeholder(kind: PlaceholderKind, text: &str) -> Node {
    Node::Placeholder(Placeholder {
        kind,
        text: text.to_string(),
    })
}

fn field(field: Field, value: &str, error: Option<String>) -> Node {
    Node::Field(FieldNode {
        field,
        label: field.label().to_string(),
        value: value.to_string(),
        error,
    })
}

/// One bullet per character.
fn mask(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use api_types::category::Category;
    use chrono::Local;

    use super::*;
    use crate::app::state::{NoticeLevel, PendingConfirm, RenameDraft};

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon_count: None,
        }
    }

    fn icon(id: &str, category_id: Option<&str>) -> Icon {
        Icon {
            id: id.to_string(),
            filename: format!("{id}.svg"),
            category_id: category_id.map(str::to_string),
            tags: vec!["ui".to_string()],
            description: None,
        }
    }

    fn state_with_icons(logged_in: bool) -> AppState {
        let mut state = AppState::default();
        state.logged_in = logged_in;
        state.replace_categories(vec![category("1", "Tools"), category("2", "Arrows")]);
        state.apply_icons(vec![icon("10", Some("1")), icon("11", Some("7"))], Local::now());
        state
    }

    #[test]
    fn exactly_one_section_visible() {
        let mut state = AppState::default();
        for view in View::ALL {
            state.select_view(view);
            let tree = render(&state);
            assert_eq!(tree.visible_sections(), vec![view]);
        }
    }

    #[test]
    fn icon_cards_resolve_category_names() {
        let tree = render(&state_with_icons(false));
        let cards = tree.icon_cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].category, "Tools");
        assert_eq!(cards[1].category, UNCATEGORIZED);
        assert_eq!(cards[0].preview, "/api/icons/10/file");
        assert_eq!(cards[0].download, cards[0].preview);
    }

    #[test]
    fn admin_controls_follow_login() {
        let tree = render(&state_with_icons(false));
        assert!(tree.icon_cards().iter().all(|card| !card.delete && card.transfer.is_none()));
        assert!(tree.nav_item(Control::NavUpload).is_none());
        assert_eq!(tree.nav_item(Control::NavSession).unwrap().label, "Login");

        let tree = render(&state_with_icons(true));
        let cards = tree.icon_cards();
        assert!(cards[0].delete);
        let targets: Vec<_> = cards[0]
            .transfer
            .as_ref()
            .unwrap()
            .iter()
            .map(|option| option.value.as_str())
            .collect();
        assert_eq!(targets, vec!["2"]);
        assert_eq!(cards[1].transfer.as_ref().unwrap().len(), 2);
        assert!(tree.nav_item(Control::NavCategories).is_some());
        assert_eq!(tree.nav_item(Control::NavSession).unwrap().label, "Logout");
    }

    #[test]
    fn icon_list_placeholders() {
        let mut state = AppState::default();
        let tree = render(&state);
        assert_eq!(tree.placeholders(View::All)[0].kind, PlaceholderKind::Loading);

        state.apply_icons(Vec::new(), Local::now());
        let tree = render(&state);
        let placeholders = tree.placeholders(View::All);
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].kind, PlaceholderKind::Empty);

        state.fail_icons("boom".to_string());
        let tree = render(&state);
        assert_eq!(tree.placeholders(View::All).len(), 1);
        assert_eq!(tree.placeholders(View::All)[0].kind, PlaceholderKind::Error);
        assert!(tree.icon_cards().is_empty());
    }

    #[test]
    fn categories_need_login() {
        let mut state = state_with_icons(false);
        state.select_view(View::Categories);
        let tree = render(&state);
        let placeholders = tree.placeholders(View::Categories);
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].kind, PlaceholderKind::LoginPrompt);
        assert!(tree.category_rows().is_empty());

        state.logged_in = true;
        let tree = render(&state);
        assert!(tree.placeholders(View::Categories).is_empty());
        assert_eq!(tree.category_rows().len(), 2);
        assert!(tree.category_rows().iter().all(|row| row.deletable));
    }

    #[test]
    fn rename_editor_sits_on_its_row() {
        let mut state = state_with_icons(true);
        state.rename = Some(RenameDraft {
            id: "2".to_string(),
            name: "Pointers".to_string(),
            error: Some("Category name is required".to_string()),
        });
        let tree = render(&state);
        let rows = tree.category_rows();
        assert!(rows[0].rename.is_none());
        let editor = rows[1].rename.as_ref().unwrap();
        assert_eq!(editor.field, Field::CategoryRename);
        assert_eq!(editor.value, "Pointers");
        assert_eq!(editor.error.as_deref(), Some("Category name is required"));
        assert!(rows.iter().all(|row| row.renamable));
    }

    #[test]
    fn icon_editor_needs_login() {
        let mut state = state_with_icons(true);
        state.icon_edit = Some(IconEditDraft::for_icon(&icon("10", Some("1"))));
        let tree = render(&state);
        let editor = tree.icon_editor.as_ref().unwrap();
        assert_eq!(editor.tags.value, "ui");
        assert_eq!(editor.description.field, Field::IconDescription);
        assert!(tree.icon_cards().iter().all(|card| card.edit));

        state.logged_in = false;
        let tree = render(&state);
        assert!(tree.icon_editor.is_none());
        assert!(tree.icon_cards().iter().all(|card| !card.edit));
    }

    #[test]
    fn filter_select_tracks_selection() {
        let mut state = state_with_icons(false);
        state.set_filter(Some("2".to_string()));
        let tree = render(&state);
        let select = tree.select(Control::CategoryFilter).unwrap();
        assert_eq!(select.options.len(), 3);
        assert_eq!(select.selected_index(), 2);
        assert_eq!(tree.status.filter, "Arrows");
    }

    #[test]
    fn password_is_masked() {
        let mut state = AppState::new("admin");
        state.login.password = "secret".to_string();
        state.login.error = Some("Login failed".to_string());
        let tree = render(&state);
        let fields = tree.fields(View::Login);
        assert_eq!(fields[0].value, "admin");
        assert_eq!(fields[1].value, "••••••");
        assert_eq!(tree.inline_errors(View::Login), vec!["Login failed"]);
    }

    #[test]
    fn confirmation_takes_precedence_over_notices() {
        let mut state = AppState::default();
        state.notify(NoticeLevel::Info, "done");
        state.pending = Some(PendingConfirm::DeleteIcon {
            id: "1".to_string(),
            filename: "a.svg".to_string(),
        });
        assert!(matches!(render(&state).dialog, Some(Dialog::Confirm { .. })));

        state.pending = None;
        assert!(matches!(render(&state).dialog, Some(Dialog::Notice(_))));
    }
}
