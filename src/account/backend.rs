use std::fmt;
use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, SetupError};

/// Everything needed to create the account collected on the user page.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NewAccount {
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub shell: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("password", &"<redacted>")
            .field("shell", &self.shell)
            .finish()
    }
}

/// Creates OS user accounts.
pub trait AccountBackend {
    fn create_user_account(&mut self, account: &NewAccount) -> Result<()>;
}

/// Creates the account right away with `useradd` and `chpasswd`.
#[derive(Debug, Clone)]
pub struct SystemBackend {
    groups: Vec<String>,
    create_home: bool,
}

impl SystemBackend {
    pub fn new(groups: Vec<String>, create_home: bool) -> Self {
        Self {
            groups,
            create_home,
        }
    }

    fn useradd_args(&self, account: &NewAccount) -> Vec<String> {
        let mut args = Vec::new();

        if self.create_home {
            args.push("-m".to_string());
        }

        if !account.full_name.is_empty() {
            args.push("-c".to_string());
            args.push(account.full_name.clone());
        }

        args.push("-s".to_string());
        args.push(account.shell.clone());

        if !self.groups.is_empty() {
            args.push("-G".to_string());
            args.push(self.groups.join(","));
        }

        args.push(account.username.clone());
        args
    }
}

impl AccountBackend for SystemBackend {
    fn create_user_account(&mut self, account: &NewAccount) -> Result<()> {
        if !nix::unistd::Uid::effective().is_root() {
            return Err(SetupError::UserCreation(
                "creating users requires root privileges".to_string(),
            ));
        }

        info!("Creating user: {}", account.username);

        let args = self.useradd_args(account);
        debug!("Running: useradd {}", quoted(&args));

        let status = Command::new("useradd").args(&args).status()?;
        if !status.success() {
            return Err(SetupError::UserCreation(format!(
                "useradd failed with code {:?}",
                status.code()
            )));
        }

        info!("Setting password for user: {}", account.username);

        let line = Zeroizing::new(format!("{}:{}", account.username, account.password));
        let status = pipe_to(&mut Command::new("chpasswd"), &line, "chpasswd")?;
        if !status.success() {
            return Err(SetupError::UserCreation(format!(
                "chpasswd failed with code {:?}",
                status.code()
            )));
        }

        info!("User {} created successfully", account.username);
        Ok(())
    }
}

/// Writes `input` as one line to the command's stdin and waits for it to exit.
///
/// The child is always reaped, even when the write fails.
fn pipe_to(command: &mut Command, input: &str, name: &str) -> Result<ExitStatus> {
    let mut child = command.stdin(Stdio::piped()).spawn()?;

    let written = match child.stdin.take() {
        Some(mut stdin) => writeln!(stdin, "{input}"),
        None => Ok(()),
    };

    let status = child.wait()?;
    if let Err(e) = written {
        return Err(SetupError::UserCreation(format!(
            "writing to {name} failed: {e} (exit code {:?})",
            status.code()
        )));
    }

    Ok(status)
}

fn quoted(args: &[String]) -> String {
    args.iter()
        .map(|s| shell_escape::escape(s.as_str().into()).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Logs the request and changes nothing.
#[derive(Debug, Clone, Default)]
pub struct DryrunBackend {
    created: Vec<String>,
}

impl DryrunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usernames this backend pretended to create.
    pub fn created(&self) -> &[String] {
        &self.created
    }
}

impl AccountBackend for DryrunBackend {
    fn create_user_account(&mut self, account: &NewAccount) -> Result<()> {
        info!(
            "[dryrun] Would create user {} ({}) with shell {}",
            account.username, account.full_name, account.shell
        );
        self.created.push(account.username.clone());
        Ok(())
    }
}

/// Queues requests and hands them to the inner backend on [`DeferredBackend::apply`].
pub struct DeferredBackend {
    inner: Box<dyn AccountBackend + Send>,
    queue: Vec<NewAccount>,
}

impl DeferredBackend {
    pub fn new(inner: Box<dyn AccountBackend + Send>) -> Self {
        Self {
            inner,
            queue: Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs every queued request in order, stopping at the first failure.
    pub fn apply(mut self) -> Result<usize> {
        let queue = std::mem::take(&mut self.queue);
        let count = queue.len();

        for account in &queue {
            self.inner.create_user_account(account)?;
        }

        Ok(count)
    }
}

impl AccountBackend for DeferredBackend {
    fn create_user_account(&mut self, account: &NewAccount) -> Result<()> {
        if self.queue.iter().any(|queued| queued.username == account.username) {
            warn!("Replacing queued request for user {}", account.username);
            self.queue.retain(|queued| queued.username != account.username);
        }

        debug!("Deferring creation of user {}", account.username);
        self.queue.push(account.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            full_name: "Ada Lovelace".to_string(),
            password: "secret".to_string(),
            shell: "/usr/bin/bash".to_string(),
        }
    }

    struct Recording(Arc<Mutex<Vec<String>>>);

    impl AccountBackend for Recording {
        fn create_user_account(&mut self, account: &NewAccount) -> Result<()> {
            self.0.lock().unwrap().push(account.username.clone());
            Ok(())
        }
    }

    struct Failing;

    impl AccountBackend for Failing {
        fn create_user_account(&mut self, _account: &NewAccount) -> Result<()> {
            Err(SetupError::UserCreation("boom".to_string()))
        }
    }

    #[test]
    fn debug_hides_password() {
        let printed = format!("{:?}", account("ada"));
        assert!(printed.contains("ada"));
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn useradd_arguments() {
        let backend = SystemBackend::new(vec!["wheel".to_string(), "audio".to_string()], true);
        assert_eq!(
            backend.useradd_args(&account("ada")),
            ["-m", "-c", "Ada Lovelace", "-s", "/usr/bin/bash", "-G", "wheel,audio", "ada"]
        );

        let bare = SystemBackend::new(Vec::new(), false);
        let mut nameless = account("ada");
        nameless.full_name.clear();
        assert_eq!(bare.useradd_args(&nameless), ["-s", "/usr/bin/bash", "ada"]);
    }

    #[test]
    fn quoting_for_logs() {
        let args = vec!["-c".to_string(), "Ada Lovelace".to_string()];
        assert_eq!(quoted(&args), "-c 'Ada Lovelace'");
    }

    #[test]
    fn pipe_waits_for_child() {
        let status = pipe_to(
            Command::new("cat").stdout(Stdio::null()),
            "ada:secret",
            "cat",
        )
        .unwrap();
        assert!(status.success());
    }

    #[test]
    fn pipe_write_failure_reaps_child() {
        // The child exits without reading, so a large write hits a closed pipe
        let input = "x".repeat(1 << 20);
        let result = pipe_to(Command::new("sh").args(["-c", "exit 3"]), &input, "sh");

        match result {
            Err(SetupError::UserCreation(msg)) => {
                assert!(msg.starts_with("writing to sh failed"), "{msg}");
                assert!(msg.contains("exit code Some(3)"), "{msg}");
            }
            other => panic!("expected write failure, got {other:?}"),
        }
    }

    #[test]
    fn dryrun_records() {
        let mut backend = DryrunBackend::new();
        backend.create_user_account(&account("ada")).unwrap();
        assert_eq!(backend.created(), ["ada"]);
    }

    #[test]
    fn deferred_applies_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut deferred = DeferredBackend::new(Box::new(Recording(seen.clone())));

        deferred.create_user_account(&account("ada")).unwrap();
        deferred.create_user_account(&account("grace")).unwrap();
        assert_eq!(deferred.pending(), 2);
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(deferred.apply().unwrap(), 2);
        assert_eq!(*seen.lock().unwrap(), vec!["ada".to_string(), "grace".to_string()]);
    }

    #[test]
    fn deferred_replaces_duplicate_request() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut deferred = DeferredBackend::new(Box::new(Recording(seen.clone())));

        deferred.create_user_account(&account("ada")).unwrap();
        deferred.create_user_account(&account("ada")).unwrap();
        assert_eq!(deferred.pending(), 1);
    }

    #[test]
    fn deferred_surfaces_failure() {
        let mut deferred = DeferredBackend::new(Box::new(Failing));
        deferred.create_user_account(&account("ada")).unwrap();
        assert!(matches!(deferred.apply(), Err(SetupError::UserCreation(_))));
    }
}
