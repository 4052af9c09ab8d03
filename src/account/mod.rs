mod backend;
mod derive;
mod directory;
mod shells;
mod validate;

pub use backend::{AccountBackend, DeferredBackend, DryrunBackend, NewAccount, SystemBackend};
pub use derive::username_from_full_name;
pub use directory::{PasswdDirectory, StaticDirectory, UserDirectory};
pub use shells::{ShellCatalog, ShellPolicy};
pub use validate::{
    MAX_USERNAME_LEN, PasswordError, UsernameError, validate_password, validate_username,
};
