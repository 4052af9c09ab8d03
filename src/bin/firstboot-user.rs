use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use firstboot_user::account::{AccountBackend, DeferredBackend, DryrunBackend, SystemBackend};
use firstboot_user::app::{App, AppAction};
use firstboot_user::config::SetupConfig;
use firstboot_user::error::{Result, SetupError};
use firstboot_user::event::{Event, EventHandler};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "firstboot-user")]
#[command(author, version, about = "Create the first user account on a new system")]
struct Args {
    /// Path to config file (default: /etc/firstboot/user.toml)
    #[arg(long)]
    config: Option<String>,

    /// Log the account instead of creating it
    #[arg(long)]
    dryrun: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting firstboot-user");
        }
    }

    let mut config = match args.config.as_deref() {
        Some(path) => SetupConfig::load_from(path),
        None => SetupConfig::load(),
    }
    .unwrap_or_else(|e| {
        warn!("Invalid config, using defaults: {}", e);
        SetupConfig::default()
    });

    // --dryrun flag overrides config
    if args.dryrun {
        config.general.dryrun = true;
    }

    let inner: Box<dyn AccountBackend + Send> = if config.general.dryrun {
        Box::new(DryrunBackend::new())
    } else {
        Box::new(SystemBackend::new(
            config.user.groups.clone(),
            config.user.create_home,
        ))
    };
    let mut backend = DeferredBackend::new(inner);

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_page(&mut terminal, config, &mut backend).await;
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("User page error: {}", e);
        return result;
    }

    if backend.pending() == 0 {
        info!("No account submitted");
        return Ok(());
    }

    // Account creation runs after the terminal is restored
    let created = tokio::task::spawn_blocking(move || backend.apply())
        .await
        .map_err(|e| SetupError::Command(e.to_string()))?;

    match created {
        Ok(count) => {
            info!("Created {} account(s)", count);
            Ok(())
        }
        Err(e) => {
            error!("Account creation failed: {}", e);
            eprintln!("Account creation failed: {e}");
            Err(e)
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| SetupError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| SetupError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| SetupError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| SetupError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)
        .map_err(|e| SetupError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_page(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: SetupConfig,
    backend: &mut DeferredBackend,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);
    let mut app = App::new(config);

    loop {
        terminal
            .draw(|frame| firstboot_user::ui::draw(frame, &app))
            .map_err(|e| SetupError::Terminal(e.to_string()))?;

        match events.next().await {
            Some(Event::Key(key)) => match app.handle_key(key) {
                Some(AppAction::Submit) => {
                    app.submit(backend);
                }
                Some(AppAction::Quit) => {
                    info!("Quit without creating an account");
                    app.should_exit = true;
                }
                None => {}
            },
            Some(Event::Resize) | Some(Event::Tick) => {}
            None => break,
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}
