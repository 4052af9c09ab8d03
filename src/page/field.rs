/// Inputs on the user page, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FullName,
    Username,
    Password,
    PasswordConfirmation,
    Shell,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::FullName,
        Field::Username,
        Field::Password,
        Field::PasswordConfirmation,
        Field::Shell,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Confirm",
            Field::Shell => "Shell",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Notifications the input widgets send to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Text of a field changed
    Changed(Field, String),
    /// Shell selector moved; `None` when nothing is selected
    ShellSelected(Option<usize>),
    /// Field activated, e.g. Enter pressed
    Activated(Field),
}
