//! The user account page: field state, validation and the "ready" signal.

mod field;

pub use field::{Field, FieldEvent};

use std::collections::HashSet;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::account::{
    AccountBackend, NewAccount, PasswordError, ShellCatalog, UsernameError,
    username_from_full_name, validate_password, validate_username,
};
use crate::i18n::{Identity, Translate};

/// The window hosting the page. It owns navigation; the page only reports.
pub trait PageHost {
    /// Called after every state change with whether the page may be left.
    fn set_ready(&mut self, ready: bool);

    /// Called when the user activates the full name or username field.
    fn finish_step(&mut self);
}

pub struct UserPage<H: PageHost> {
    host: H,
    translator: Box<dyn Translate>,
    existing_users: HashSet<String>,
    shells: ShellCatalog,

    full_name: String,
    // What the username field shows, which may be invalid.
    username_entry: String,
    // Last valid username, empty while the field is in error.
    username: String,
    automatic_username: String,
    user_changed_username: bool,
    password: Zeroizing<String>,
    password_confirmation: Zeroizing<String>,
    shell: String,

    focus: Field,
    username_error: Option<UsernameError>,
    password_error: Option<PasswordError>,
    message: Option<String>,
    ready: bool,
}

impl<H: PageHost> UserPage<H> {
    pub fn new(host: H, existing_users: HashSet<String>, shells: ShellCatalog) -> Self {
        let shell = shells.default_shell().to_string();
        debug!(
            "User page with {} existing accounts, default shell {}",
            existing_users.len(),
            shell
        );

        Self {
            host,
            translator: Box::new(Identity),
            existing_users,
            shells,
            full_name: String::new(),
            username_entry: String::new(),
            username: String::new(),
            automatic_username: String::new(),
            user_changed_username: false,
            password: Zeroizing::new(String::new()),
            password_confirmation: Zeroizing::new(String::new()),
            shell,
            focus: Field::FullName,
            username_error: None,
            password_error: None,
            message: None,
            ready: false,
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translate>) -> Self {
        self.translator = translator;
        self
    }

    /// Dispatches a field notification to its handler.
    pub fn handle(&mut self, event: FieldEvent) {
        match event {
            FieldEvent::Changed(Field::FullName, text) => self.on_full_name_changed(&text),
            FieldEvent::Changed(Field::Username, text) => self.on_username_changed(&text),
            FieldEvent::Changed(Field::Password, text) => self.on_password_changed(&text),
            FieldEvent::Changed(Field::PasswordConfirmation, text) => {
                self.on_password_confirmation_changed(&text)
            }
            FieldEvent::Changed(Field::Shell, _) => {
                debug!("Ignoring text change on the shell selector");
            }
            FieldEvent::ShellSelected(selected) => self.on_shell_selection_changed(selected),
            FieldEvent::Activated(field) => self.on_field_activated(field),
        }
    }

    pub fn on_full_name_changed(&mut self, text: &str) {
        self.full_name = text.to_string();
        self.verify_continue();
        self.generate_username();
    }

    pub fn on_username_changed(&mut self, text: &str) {
        self.username_entry = text.to_string();

        if !text.is_empty() && text != self.automatic_username && !self.user_changed_username {
            debug!("Username edited by hand, automatic username disabled");
            self.user_changed_username = true;
        }

        if let Err(err) = validate_username(text, &self.existing_users) {
            self.username.clear();
            self.username_error = Some(err);
            self.message = Some(self.translator.translate(&err.to_string()));
            self.verify_continue();
            return;
        }

        self.username = text.to_string();
        self.username_error = None;
        self.message = None;
        self.verify_continue();
    }

    pub fn on_password_changed(&mut self, text: &str) {
        self.password.zeroize();
        self.password.push_str(text);
        self.update_password_errors();
        self.verify_continue();
    }

    pub fn on_password_confirmation_changed(&mut self, text: &str) {
        self.password_confirmation.zeroize();
        self.password_confirmation.push_str(text);
        self.update_password_errors();
        self.verify_continue();
    }

    /// `None` means the selector has no selection and is ignored.
    pub fn on_shell_selection_changed(&mut self, selected: Option<usize>) {
        let Some(index) = selected else {
            return;
        };

        match self.shells.get(index) {
            Some(shell) => {
                debug!("Shell selected: {}", shell);
                self.shell = shell.to_string();
            }
            None => warn!("Shell selection {} is out of range", index),
        }
    }

    pub fn on_field_activated(&mut self, field: Field) {
        if matches!(field, Field::FullName | Field::Username) {
            self.host.finish_step();
        }
    }

    pub fn set_page_active(&mut self) {
        self.focus = Field::FullName;
        self.verify_continue();
    }

    pub fn set_page_inactive(&mut self) {}

    /// Hands the collected values to the backend. Backend failures are logged only.
    pub fn finish(&mut self, backend: &mut dyn AccountBackend) -> bool {
        let account = NewAccount {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            password: self.password.as_str().to_string(),
            shell: self.shell.clone(),
        };

        info!("Submitting account {} with shell {}", account.username, account.shell);
        if let Err(e) = backend.create_user_account(&account) {
            warn!("Account backend reported: {}", e);
        }

        true
    }

    fn generate_username(&mut self) {
        if self.user_changed_username {
            return;
        }

        let Some(username) = username_from_full_name(&self.full_name) else {
            return;
        };

        // Writing the same text into the field is not a change
        if username == self.username_entry {
            self.automatic_username = username;
            return;
        }

        self.automatic_username = username.clone();
        self.on_username_changed(&username);
    }

    fn update_password_errors(&mut self) {
        match validate_password(&self.password, &self.password_confirmation) {
            Ok(()) => {
                self.password_error = None;
                self.message = None;
            }
            Err(err) => {
                self.password_error = Some(err);
                self.message = Some(self.translator.translate(&err.to_string()));
            }
        }
    }

    fn verify_continue(&mut self) {
        let password_ok = validate_password(&self.password, &self.password_confirmation).is_ok();
        self.ready = !self.username.is_empty() && !self.full_name.is_empty() && password_ok;
        self.host.set_ready(self.ready);
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The last valid username, empty while the field is in error.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Current contents of the username field, including automatic fills.
    pub fn username_entry(&self) -> &str {
        &self.username_entry
    }

    pub fn user_changed_username(&self) -> bool {
        self.user_changed_username
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn shells(&self) -> &ShellCatalog {
        &self.shells
    }

    pub fn shell_index(&self) -> Option<usize> {
        self.shells.position(&self.shell)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The error currently shown under the form.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn username_error(&self) -> Option<UsernameError> {
        self.username_error
    }

    pub fn password_error(&self) -> Option<PasswordError> {
        self.password_error
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{DryrunBackend, ShellPolicy};
    use crate::error::{Result, SetupError};
    use crate::i18n::Catalog;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingHost {
        ready: Vec<bool>,
        finished: usize,
    }

    impl PageHost for RecordingHost {
        fn set_ready(&mut self, ready: bool) {
            self.ready.push(ready);
        }

        fn finish_step(&mut self) {
            self.finished += 1;
        }
    }

    fn page() -> UserPage<RecordingHost> {
        let existing = ["root", "bin", "ada"].iter().map(|s| s.to_string()).collect();
        let shells = ShellCatalog::parse(
            "# comment\n\n/usr/bin/bash\n/usr/bin/zsh\n/usr/bin/bash\n",
            &ShellPolicy::default(),
        );
        UserPage::new(RecordingHost::default(), existing, shells)
    }

    fn fill_passwords(page: &mut UserPage<RecordingHost>, password: &str, confirmation: &str) {
        page.on_password_changed(password);
        page.on_password_confirmation_changed(confirmation);
    }

    #[test]
    fn full_name_derives_username() {
        let mut page = page();
        page.on_full_name_changed("  Grace HOPPER ");
        assert_eq!(page.username_entry(), "grace-hopper");
        assert_eq!(page.username(), "grace-hopper");
        assert!(!page.user_changed_username());
    }

    #[test]
    fn empty_full_name_leaves_username_alone() {
        let mut page = page();
        page.on_full_name_changed("");
        assert_eq!(page.username_entry(), "");

        page.on_username_changed("custom");
        page.on_full_name_changed("");
        assert_eq!(page.username_entry(), "custom");
    }

    #[test]
    fn manual_edit_latches_forever() {
        let mut page = page();
        page.on_full_name_changed("Grace");
        assert_eq!(page.username(), "grace");

        page.on_username_changed("gh");
        assert!(page.user_changed_username());

        page.on_full_name_changed("Grace Hopper");
        assert_eq!(page.username_entry(), "gh");

        // clearing the field or retyping the automatic value does not reset it
        page.on_username_changed("");
        page.on_username_changed("grace-hopper");
        page.on_full_name_changed("Someone Else");
        assert!(page.user_changed_username());
        assert_eq!(page.username_entry(), "grace-hopper");
    }

    #[test]
    fn typing_automatic_value_does_not_latch() {
        let mut page = page();
        page.on_full_name_changed("Grace");
        page.on_username_changed("grace");
        assert!(!page.user_changed_username());
        page.on_username_changed("");
        assert!(!page.user_changed_username());
    }

    #[test]
    fn rederiving_same_username_keeps_password_message() {
        let mut page = page();
        page.on_full_name_changed("Grace");
        fill_passwords(&mut page, "abc", "abd");
        assert_eq!(page.message(), Some("Passwords do not match."));

        page.on_full_name_changed("Grace ");
        assert_eq!(page.username_entry(), "grace");
        assert_eq!(page.message(), Some("Passwords do not match."));
        assert!(!page.is_ready());

        page.on_full_name_changed("Grace H");
        assert_eq!(page.username_entry(), "grace-h");
        assert_eq!(page.message(), None);
    }

    #[test]
    fn invalid_username_clears_commit() {
        let mut page = page();
        page.on_username_changed("grace");
        assert_eq!(page.username(), "grace");

        page.on_username_changed("Ada");
        assert_eq!(page.username(), "");
        assert_eq!(page.username_entry(), "Ada");
        assert_eq!(page.username_error(), Some(UsernameError::InvalidCharacters));
        assert_eq!(
            page.message(),
            Some("Username cannot contain special characters or uppercase letters.")
        );

        page.on_username_changed(&"a".repeat(33));
        assert_eq!(page.username_error(), Some(UsernameError::TooLong));

        page.on_username_changed("ada");
        assert_eq!(page.message(), Some("This username is already in use."));

        page.on_username_changed("ada2");
        assert_eq!(page.username(), "ada2");
        assert_eq!(page.username_error(), None);
        assert_eq!(page.message(), None);
    }

    #[test]
    fn derived_username_can_collide() {
        let mut page = page();
        page.on_full_name_changed("Ada");
        assert_eq!(page.username_entry(), "ada");
        assert_eq!(page.username(), "");
        assert_eq!(page.username_error(), Some(UsernameError::AlreadyInUse));
        assert!(!page.user_changed_username());
    }

    #[test]
    fn password_errors() {
        let mut page = page();
        fill_passwords(&mut page, "", "");
        assert_eq!(page.password_error(), Some(PasswordError::Empty));
        assert_eq!(page.message(), Some("Password cannot be empty."));

        fill_passwords(&mut page, "abc", "abd");
        assert_eq!(page.password_error(), Some(PasswordError::Mismatch));
        assert_eq!(page.message(), Some("Passwords do not match."));

        fill_passwords(&mut page, "abc", "abc");
        assert_eq!(page.password_error(), None);
        assert_eq!(page.message(), None);
    }

    #[test]
    fn readiness_truth_table() {
        for username_ok in [false, true] {
            for name_set in [false, true] {
                for password_ok in [false, true] {
                    let mut page = page();
                    if name_set {
                        page.on_full_name_changed("Grace Hopper");
                    }
                    page.on_username_changed(if username_ok { "grace" } else { "Grace" });
                    if password_ok {
                        fill_passwords(&mut page, "abc", "abc");
                    } else {
                        fill_passwords(&mut page, "abc", "abd");
                    }

                    let expected = username_ok && name_set && password_ok;
                    assert_eq!(
                        page.is_ready(),
                        expected,
                        "username_ok={username_ok} name_set={name_set} password_ok={password_ok}"
                    );
                    assert_eq!(page.host().ready.last(), Some(&expected));
                }
            }
        }
    }

    #[test]
    fn every_change_publishes_readiness() {
        let mut page = page();
        page.on_password_changed("abc");
        page.on_password_confirmation_changed("abc");
        page.on_username_changed("grace");
        assert_eq!(page.host().ready, vec![false, false, false]);

        page.on_full_name_changed("Grace");
        assert_eq!(page.host().ready.last(), Some(&true));
    }

    #[test]
    fn clearing_full_name_blocks_continue() {
        let mut page = page();
        page.on_full_name_changed("Grace");
        fill_passwords(&mut page, "pw", "pw");
        assert!(page.is_ready());

        page.on_full_name_changed("");
        assert!(!page.is_ready());
        assert_eq!(page.username(), "grace");
    }

    #[test]
    fn shell_selection() {
        let mut page = page();
        assert_eq!(page.shell(), "/usr/bin/bash");
        assert_eq!(page.shell_index(), Some(0));

        page.on_shell_selection_changed(Some(1));
        assert_eq!(page.shell(), "/usr/bin/zsh");

        page.on_shell_selection_changed(None);
        assert_eq!(page.shell(), "/usr/bin/zsh");

        page.on_shell_selection_changed(Some(7));
        assert_eq!(page.shell(), "/usr/bin/zsh");
    }

    #[test]
    fn activation_finishes_step_for_name_fields_only() {
        let mut page = page();
        page.handle(FieldEvent::Activated(Field::FullName));
        page.handle(FieldEvent::Activated(Field::Username));
        page.handle(FieldEvent::Activated(Field::Password));
        page.handle(FieldEvent::Activated(Field::Shell));
        assert_eq!(page.host().finished, 2);
    }

    #[test]
    fn page_activation_focuses_full_name() {
        let mut page = page();
        page.set_focus(Field::Shell);
        page.set_page_active();
        assert_eq!(page.focus(), Field::FullName);
        assert_eq!(page.host().ready, vec![false]);
    }

    #[test]
    fn events_route_to_handlers() {
        let mut page = page();
        page.handle(FieldEvent::Changed(Field::FullName, "Grace Hopper".to_string()));
        page.handle(FieldEvent::Changed(Field::Password, "pw".to_string()));
        page.handle(FieldEvent::Changed(Field::PasswordConfirmation, "pw".to_string()));
        page.handle(FieldEvent::ShellSelected(Some(1)));
        assert!(page.is_ready());
        assert_eq!(page.shell(), "/usr/bin/zsh");
    }

    #[test]
    fn messages_are_translated() {
        let mut entries = HashMap::new();
        entries.insert(
            "Passwords do not match.".to_string(),
            "Les mots de passe ne correspondent pas.".to_string(),
        );
        let mut page = page().with_translator(Box::new(Catalog::new(entries)));

        fill_passwords(&mut page, "a", "b");
        assert_eq!(page.message(), Some("Les mots de passe ne correspondent pas."));
    }

    #[test]
    fn finish_hands_over_values() {
        let mut page = page();
        page.on_full_name_changed("Grace Hopper");
        fill_passwords(&mut page, "pw", "pw");
        page.on_shell_selection_changed(Some(1));

        let mut backend = DryrunBackend::new();
        assert!(page.finish(&mut backend));
        assert_eq!(backend.created(), ["grace-hopper"]);
    }

    #[test]
    fn finish_ignores_backend_failure() {
        struct Failing;
        impl AccountBackend for Failing {
            fn create_user_account(&mut self, _account: &NewAccount) -> Result<()> {
                Err(SetupError::UserCreation("useradd failed".to_string()))
            }
        }

        let mut page = page();
        page.on_full_name_changed("Grace");
        assert!(page.finish(&mut Failing));
    }
}
