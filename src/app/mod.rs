mod input;
mod status;

pub use input::InputBuffer;
pub use status::StatusBarState;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::account::{AccountBackend, PasswdDirectory, ShellCatalog, UserDirectory};
use crate::config::SetupConfig;
use crate::i18n::Catalog;
use crate::page::{Field, FieldEvent, PageHost, UserPage};
use crate::ui::Theme;

/// Actions the main loop carries out for the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Hand the account to the backend and leave
    Submit,
    /// Leave without creating anything
    Quit,
}

/// Receives the page's signals for the terminal window.
#[derive(Debug, Default)]
pub struct WizardHost {
    ready: bool,
    step_finished: bool,
}

impl WizardHost {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns whether the page asked to finish since the last call.
    pub fn take_step_finished(&mut self) -> bool {
        std::mem::take(&mut self.step_finished)
    }
}

impl PageHost for WizardHost {
    fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    fn finish_step(&mut self) {
        self.step_finished = true;
    }
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub config: SetupConfig,
    pub theme: Theme,
    pub page: UserPage<WizardHost>,

    pub full_name: InputBuffer,
    pub username: InputBuffer,
    pub password: InputBuffer,
    pub password_confirm: InputBuffer,

    pub message: Option<Message>,
    pub status_bar: StatusBarState,
    pub should_exit: bool,
    pub submitted: bool,
}

impl App {
    pub fn new(config: SetupConfig) -> Self {
        let directory = PasswdDirectory::new(&config.user.passwd_file);
        let shells = ShellCatalog::load(&config.user.shells_file, &config.user.shell_policy());
        Self::with_sources(config, &directory, shells)
    }

    pub fn with_sources(
        config: SetupConfig,
        directory: &dyn UserDirectory,
        shells: ShellCatalog,
    ) -> Self {
        let translator = Box::new(Catalog::new(config.translations.clone()));
        let mut page = UserPage::new(WizardHost::default(), directory.existing_usernames(), shells)
            .with_translator(translator);
        page.set_page_active();

        let mut app = Self {
            config,
            theme: Theme::default(),
            page,
            full_name: InputBuffer::new(),
            username: InputBuffer::new(),
            password: InputBuffer::masked(),
            password_confirm: InputBuffer::masked(),
            message: None,
            status_bar: StatusBarState::default(),
            should_exit: false,
            submitted: false,
        };
        app.update_status_bar();
        app
    }

    pub fn is_dryrun(&self) -> bool {
        self.config.general.dryrun
    }

    pub fn focus(&self) -> Field {
        self.page.focus()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        // Any key dismisses the current message
        self.message = None;

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Char('c') if ctrl => Some(AppAction::Quit),
            KeyCode::Esc => Some(AppAction::Quit),
            KeyCode::Tab | KeyCode::Down => {
                self.page.set_focus(self.focus().next());
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.page.set_focus(self.focus().prev());
                None
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Left if self.focus() == Field::Shell => {
                self.cycle_shell(false);
                None
            }
            KeyCode::Right if self.focus() == Field::Shell => {
                self.cycle_shell(true);
                None
            }
            KeyCode::Left => self.edit(|buf| {
                buf.move_left();
                false
            }),
            KeyCode::Right => self.edit(|buf| {
                buf.move_right();
                false
            }),
            KeyCode::Home => self.edit(|buf| {
                buf.move_start();
                false
            }),
            KeyCode::End => self.edit(|buf| {
                buf.move_end();
                false
            }),
            KeyCode::Backspace => self.edit(InputBuffer::delete_back),
            KeyCode::Delete => self.edit(InputBuffer::delete_forward),
            KeyCode::Char('u') if ctrl => self.edit(|buf| {
                let changed = !buf.is_empty();
                buf.clear();
                changed
            }),
            KeyCode::Char(c) if !ctrl => self.edit(|buf| {
                buf.insert(c);
                true
            }),
            _ => None,
        };

        self.update_status_bar();
        action
    }

    /// Hands the account to the backend and marks the wizard done.
    pub fn submit(&mut self, backend: &mut dyn AccountBackend) -> bool {
        if !self.page.is_ready() {
            return false;
        }

        let finished = self.page.finish(backend);
        self.page.set_page_inactive();
        self.submitted = finished;
        self.should_exit = finished;
        self.set_info(format!("Account {} saved", self.page.username()));
        self.status_bar = StatusBarState::submitted();
        finished
    }

    fn activate(&mut self) -> Option<AppAction> {
        let focus = self.focus();
        self.page.handle(FieldEvent::Activated(focus));

        let wants_finish = self.page.host_mut().take_step_finished() || focus == Field::Shell;
        if !wants_finish {
            self.page.set_focus(focus.next());
            return None;
        }

        if self.page.is_ready() {
            Some(AppAction::Submit)
        } else {
            let text = self
                .page
                .message()
                .unwrap_or("Fill in every field to continue")
                .to_string();
            self.set_error(text);
            None
        }
    }

    /// Applies an edit to the focused text field; `f` returns whether the text changed.
    fn edit<F>(&mut self, f: F) -> Option<AppAction>
    where
        F: FnOnce(&mut InputBuffer) -> bool,
    {
        let field = self.focus();
        let Some(buffer) = self.buffer_mut(field) else {
            return None;
        };

        if f(buffer) {
            self.notify_changed(field);
            self.sync_username();
        }

        None
    }

    /// Passes the field text to the page by reference so passwords are never copied.
    fn notify_changed(&mut self, field: Field) {
        match field {
            Field::FullName => self.page.on_full_name_changed(self.full_name.content()),
            Field::Username => self.page.on_username_changed(self.username.content()),
            Field::Password => self.page.on_password_changed(self.password.content()),
            Field::PasswordConfirmation => self
                .page
                .on_password_confirmation_changed(self.password_confirm.content()),
            Field::Shell => {}
        }
    }

    /// Mirrors automatic username fills into the username field.
    fn sync_username(&mut self) {
        if self.username.content() != self.page.username_entry() {
            debug!("Username field set to {:?}", self.page.username_entry());
            self.username.set(self.page.username_entry());
        }
    }

    fn cycle_shell(&mut self, forward: bool) {
        let count = self.page.shells().len();
        if count == 0 {
            return;
        }

        let next = match (self.page.shell_index(), forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.page.handle(FieldEvent::ShellSelected(Some(next)));
    }

    fn buffer_mut(&mut self, field: Field) -> Option<&mut InputBuffer> {
        match field {
            Field::FullName => Some(&mut self.full_name),
            Field::Username => Some(&mut self.username),
            Field::Password => Some(&mut self.password),
            Field::PasswordConfirmation => Some(&mut self.password_confirm),
            Field::Shell => None,
        }
    }

    pub fn buffer(&self, field: Field) -> Option<&InputBuffer> {
        match field {
            Field::FullName => Some(&self.full_name),
            Field::Username => Some(&self.username),
            Field::Password => Some(&self.password),
            Field::PasswordConfirmation => Some(&self.password_confirm),
            Field::Shell => None,
        }
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        info!("{}", text);
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn update_status_bar(&mut self) {
        if self.submitted {
            return;
        }
        self.status_bar = StatusBarState::for_field(self.focus(), self.page.is_ready());
    }
}
