pub mod controller;
pub mod cursor;
pub mod events;
pub mod state;

use std::{collections::VecDeque, future::Future, time::Duration};

use crossterm::event::{self, Event as TermEvent, KeyEvent, KeyEventKind};
use tokio::sync::watch;

use crate::{
    client::HttpTransport,
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
    view::{CategoryRow, Dialog, IconCard, ViewTree},
};

pub use controller::{
    CategoriesTicket, Controller, ControllerSettings, IconUpload, IconsTicket, LoadOutcome,
};
pub use cursor::{CategoriesFocus, Cursor, IconEditFocus, LoginFocus, Picker, UploadFocus};
pub use events::{Control, Event, EventKind, EventTable, Operation};
pub use state::{
    AppState, Field, FieldEdit, IconEditDraft, IconList, NoticeLevel, PendingConfirm, RenameDraft,
    View,
};

const NAV_CONTROLS: [Control; 4] = [
    Control::NavAll,
    Control::NavCategories,
    Control::NavUpload,
    Control::NavSession,
];

pub struct App {
    server: String,
    controller: Controller<HttpTransport>,
    cursor: Cursor,
    /// Events produced by the last key press, run in order.
    queue: VecDeque<Event>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let controller = Controller::new(
            transport,
            ControllerSettings {
                username: config.username.clone(),
                download_dir: config.download_dir.clone(),
            },
        );

        Ok(Self {
            server: config.base_url,
            controller,
            cursor: Cursor::default(),
            queue: VecDeque::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);
        let mut updates = self.controller.subscribe();

        self.draw(terminal)?;
        drive(
            terminal,
            &mut updates,
            &self.cursor,
            &self.server,
            self.controller.init(),
        )
        .await?;
        self.cursor.clamp(self.controller.view());

        while !self.should_quit {
            self.draw(terminal)?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    TermEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    TermEvent::Paste(text) => self.paste(&text),
                    _ => {}
                }
            }

            while let Some(event) = self.queue.pop_front() {
                drive(
                    terminal,
                    &mut updates,
                    &self.cursor,
                    &self.server,
                    self.controller.dispatch(event),
                )
                .await?;
                self.cursor.clamp(self.controller.view());
            }
        }

        Ok(())
    }

    fn draw(&self, terminal: &mut ui::Terminal) -> Result<()> {
        draw_tree(terminal, self.controller.view(), &self.cursor, &self.server)
    }

    fn dispatch(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    fn tree(&self) -> &ViewTree {
        self.controller.view()
    }

    fn renaming(&self) -> bool {
        self.tree()
            .category_rows()
            .iter()
            .any(|row| row.rename.is_some())
    }

    /// Text field that receives printable keys, if any.
    fn typing_field(&self) -> Option<Field> {
        let tree = self.tree();
        if tree.dialog.is_some() || self.cursor.picker.is_some() {
            return None;
        }
        if tree.icon_editor.is_some() {
            return Some(self.cursor.icon_edit_field());
        }
        if tree.detail.is_some() {
            return None;
        }
        let logged_in = self.controller.state().logged_in;
        match self.controller.state().view {
            View::Login => Some(self.cursor.login_field()),
            View::Upload => self.cursor.upload_field(),
            View::Categories if logged_in && self.renaming() => Some(Field::CategoryRename),
            View::Categories if logged_in && self.cursor.categories == CategoriesFocus::Name => {
                Some(Field::CategoryName)
            }
            View::All | View::Categories => None,
        }
    }

    fn paste(&mut self, text: &str) {
        let Some(field) = self.typing_field() else {
            return;
        };
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            self.dispatch(Event::input(field, FieldEdit::Insert(ch)));
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let typing = self.typing_field();
        let action = map_key(key, typing.is_some());

        match action {
            AppAction::Quit => {
                self.should_quit = true;
                return;
            }
            AppAction::None => return,
            _ => {}
        }

        match self.tree().dialog.clone() {
            Some(Dialog::Confirm { .. }) => return self.handle_confirm(action),
            Some(Dialog::Notice(_)) => return self.handle_notice(action),
            None => {}
        }

        if let Some(field) = typing {
            match action {
                AppAction::Input(ch) => {
                    return self.dispatch(Event::input(field, FieldEdit::Insert(ch)));
                }
                AppAction::Backspace => {
                    return self.dispatch(Event::input(field, FieldEdit::Backspace));
                }
                AppAction::ClearField => {
                    return self.dispatch(Event::input(field, FieldEdit::Clear));
                }
                _ => {}
            }
        }

        if self.tree().icon_editor.is_some() {
            return self.handle_icon_editor(action);
        }
        if self.tree().detail.is_some() {
            return self.handle_detail(action);
        }
        if self.cursor.picker.is_some() {
            return self.handle_picker(action);
        }

        if let AppAction::Nav(index) = action {
            return self.navigate(index);
        }

        match self.controller.state().view {
            View::All => self.handle_icons(action),
            View::Categories => self.handle_categories(action),
            View::Upload => self.handle_upload(action),
            View::Login => self.handle_login(action),
        }
    }

    fn navigate(&mut self, index: usize) {
        let Some(control) = NAV_CONTROLS.get(index).copied() else {
            return;
        };
        // Hidden entries cannot be activated.
        if self.tree().nav_item(control).is_none() {
            return;
        }
        self.dispatch(Event::click(control));
    }

    fn handle_confirm(&mut self, action: AppAction) {
        match action {
            AppAction::Yes | AppAction::Submit => self.dispatch(Event::click(Control::ConfirmYes)),
            AppAction::No | AppAction::Cancel => self.dispatch(Event::click(Control::ConfirmNo)),
            _ => {}
        }
    }

    fn handle_notice(&mut self, action: AppAction) {
        if matches!(action, AppAction::Submit | AppAction::Cancel) {
            self.dispatch(Event::click(Control::NoticeDismiss));
        }
    }

    fn handle_detail(&mut self, action: AppAction) {
        match action {
            AppAction::Submit | AppAction::Cancel | AppAction::Details => {
                self.dispatch(Event::click(Control::DetailClose));
            }
            AppAction::Edit => {
                let id = self.tree().detail.as_ref().map(|detail| detail.id.clone());
                if let Some(id) = id {
                    self.dispatch(Event::click(Control::IconEdit).target(id));
                }
            }
            _ => {}
        }
    }

    fn handle_icon_editor(&mut self, action: AppAction) {
        match action {
            AppAction::NextField | AppAction::Up | AppAction::Down => {
                self.cursor.next_icon_edit_field();
            }
            AppAction::Submit => self.dispatch(Event::submit(Control::IconEditForm)),
            AppAction::Cancel => self.dispatch(Event::click(Control::IconEditCancel)),
            _ => {}
        }
    }

    fn handle_picker(&mut self, action: AppAction) {
        match action {
            AppAction::Up => self.cursor.move_picker(-1),
            AppAction::Down => self.cursor.move_picker(1),
            AppAction::Cancel => self.cursor.picker = None,
            AppAction::Submit => {
                let Some(picker) = self.cursor.picker.take() else {
                    return;
                };
                let Some(choice) = picker.choice() else {
                    return;
                };
                let event = Event::change(Control::IconTransfer, choice.value.clone())
                    .target(picker.icon_id.clone());
                self.dispatch(event);
            }
            _ => {}
        }
    }

    fn selected_icon(&self) -> Option<&IconCard> {
        self.tree().icon_cards().get(self.cursor.icon).copied()
    }

    fn selected_category(&self) -> Option<&CategoryRow> {
        self.tree().category_rows().get(self.cursor.category).copied()
    }

    fn cycle_select(&mut self, control: Control, delta: isize) {
        let value = self
            .tree()
            .select(control)
            .and_then(|select| cursor::cycle_select(select, delta))
            .map(|option| option.value.clone());
        if let Some(value) = value {
            self.dispatch(Event::change(control, value));
        }
    }

    fn handle_icons(&mut self, action: AppAction) {
        let len = self.tree().icon_cards().len();
        match action {
            AppAction::Up => self.cursor.move_icon(-1, len),
            AppAction::Down => self.cursor.move_icon(1, len),
            AppAction::Left => self.cycle_select(Control::CategoryFilter, -1),
            AppAction::Right => self.cycle_select(Control::CategoryFilter, 1),
            AppAction::Refresh => self.dispatch(Event::click(Control::Refresh)),
            AppAction::Transfer => {
                self.cursor.open_picker(self.controller.view());
            }
            AppAction::Delete => {
                let id = self.selected_icon().filter(|card| card.delete).map(|card| card.id.clone());
                if let Some(id) = id {
                    self.dispatch(Event::click(Control::IconDelete).target(id));
                }
            }
            AppAction::Edit => {
                let id = self.selected_icon().filter(|card| card.edit).map(|card| card.id.clone());
                if let Some(id) = id {
                    self.dispatch(Event::click(Control::IconEdit).target(id));
                }
            }
            AppAction::Download => {
                if let Some(id) = self.selected_icon().map(|card| card.id.clone()) {
                    self.dispatch(Event::click(Control::IconDownload).target(id));
                }
            }
            AppAction::Details | AppAction::Submit => {
                if let Some(id) = self.selected_icon().map(|card| card.id.clone()) {
                    self.dispatch(Event::click(Control::IconDetails).target(id));
                }
            }
            _ => {}
        }
    }

    fn handle_categories(&mut self, action: AppAction) {
        if !self.controller.state().logged_in {
            if action == AppAction::Submit {
                self.navigate(3);
            }
            return;
        }

        if self.renaming() {
            match action {
                AppAction::Submit => self.dispatch(Event::submit(Control::RenameForm)),
                AppAction::Cancel => self.dispatch(Event::click(Control::RenameCancel)),
                _ => {}
            }
            return;
        }

        let len = self.tree().category_rows().len();
        match action {
            AppAction::NextField => self.cursor.toggle_categories_focus(),
            AppAction::Cancel => self.dispatch(Event::click(Control::NavAll)),
            AppAction::Submit if self.cursor.categories == CategoriesFocus::Name => {
                self.dispatch(Event::click(Control::AddCategory));
            }
            AppAction::Up => self.cursor.move_category(-1, len),
            AppAction::Down => self.cursor.move_category(1, len),
            AppAction::Delete if self.cursor.categories == CategoriesFocus::List => {
                let id = self
                    .selected_category()
                    .filter(|row| row.deletable)
                    .map(|row| row.id.clone());
                if let Some(id) = id {
                    self.dispatch(Event::click(Control::CategoryDelete).target(id));
                }
            }
            AppAction::Edit if self.cursor.categories == CategoriesFocus::List => {
                let id = self
                    .selected_category()
                    .filter(|row| row.renamable)
                    .map(|row| row.id.clone());
                if let Some(id) = id {
                    self.dispatch(Event::click(Control::CategoryRename).target(id));
                }
            }
            _ => {}
        }
    }

    fn handle_upload(&mut self, action: AppAction) {
        match action {
            AppAction::NextField | AppAction::Down => self.cursor.next_upload_field(),
            AppAction::Cancel => self.dispatch(Event::click(Control::NavAll)),
            AppAction::Submit => self.dispatch(Event::submit(Control::UploadForm)),
            AppAction::Left if self.cursor.upload == UploadFocus::Category => {
                self.cycle_select(Control::UploadCategory, -1);
            }
            AppAction::Right if self.cursor.upload == UploadFocus::Category => {
                self.cycle_select(Control::UploadCategory, 1);
            }
            _ => {}
        }
    }

    fn handle_login(&mut self, action: AppAction) {
        match action {
            AppAction::NextField | AppAction::Up | AppAction::Down => {
                self.cursor.next_login_field();
            }
            AppAction::Cancel => self.dispatch(Event::click(Control::NavAll)),
            AppAction::Submit => self.dispatch(Event::submit(Control::LoginForm)),
            _ => {}
        }
    }
}

fn draw_tree(
    terminal: &mut ui::Terminal,
    tree: &ViewTree,
    cursor: &Cursor,
    server: &str,
) -> Result<()> {
    terminal
        .draw(|frame| ui::render(frame, tree, cursor, server))
        .map_err(|err| AppError::Terminal(err.to_string()))?;
    Ok(())
}

/// Runs one controller call to completion and redraws every projection it
/// commits on the way, so loading states show while the server is busy.
async fn drive(
    terminal: &mut ui::Terminal,
    updates: &mut watch::Receiver<ViewTree>,
    cursor: &Cursor,
    server: &str,
    operation: impl Future<Output = ()>,
) -> Result<()> {
    let mut operation = std::pin::pin!(operation);
    loop {
        tokio::select! {
            biased;
            () = &mut operation => return Ok(()),
            changed = updates.changed() => {
                if changed.is_err() {
                    operation.await;
                    return Ok(());
                }
                let tree = updates.borrow_and_update().clone();
                let mut cursor = cursor.clone();
                cursor.clamp(&tree);
                draw_tree(terminal, &tree, &cursor, server)?;
            }
        }
    }
}
