use crate::page::Field;

/// Hint text shown in the bottom bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    pub left_hint: String,
    pub right_hint: String,
}

impl StatusBarState {
    /// Hints for the focused field
    pub fn for_field(field: Field, ready: bool) -> Self {
        let left_hint = match field {
            Field::Shell => "Left/Right: choose shell",
            Field::Password | Field::PasswordConfirmation => "Type your password",
            Field::FullName | Field::Username => "Type to enter text",
        };

        let right_hint = if ready {
            "Tab: next field  Enter: create account  Esc: quit"
        } else {
            "Tab: next field  Esc: quit"
        };

        Self {
            left_hint: left_hint.to_string(),
            right_hint: right_hint.to_string(),
        }
    }

    pub fn submitted() -> Self {
        Self {
            left_hint: "Account saved".to_string(),
            right_hint: String::new(),
        }
    }
}
