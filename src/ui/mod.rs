mod layout;
mod theme;
pub mod widgets;

pub use layout::Layout;
pub use theme::Theme;

use crate::app::App;
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let layout = Layout::new(frame.area());

    widgets::draw_background(frame, layout.full, &app.theme);
    widgets::draw_header(frame, layout.header, app);
    widgets::draw_user_form(frame, layout.content, app);
    widgets::draw_message_panel(frame, layout.message, app);
    widgets::draw_status_bar(frame, layout.status, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{ShellCatalog, ShellPolicy, StaticDirectory};
    use crate::config::SetupConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let shells = ShellCatalog::parse("/usr/bin/bash\n/usr/bin/zsh\n", &ShellPolicy::default());
        App::with_sources(SetupConfig::default(), &StaticDirectory::new(["root", "ada"]), shells)
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn draws_at_any_size() {
        let mut app = app();
        // leaves a validation message so the message panel is drawn too
        type_text(&mut app, "Ada");
        assert!(app.page.message().is_some());

        for width in 1..=100 {
            for height in [1, 5, 12, 18, 19, 20, 25, 40] {
                render(&app, width, height);
            }
        }
    }

    #[test]
    fn shows_form_at_typical_size() {
        let app = app();
        let screen = render(&app, 80, 24);
        assert!(screen.contains("Create User Account"));
        assert!(screen.contains("Full name"));
        assert!(screen.contains("/usr/bin/bash"));
        assert!(screen.contains("INCOMPLETE"));
    }

    #[test]
    fn shows_username_error() {
        let mut app = app();
        type_text(&mut app, "Ada");

        let screen = render(&app, 80, 24);
        assert!(screen.contains("This username is already in use."));
    }

    #[test]
    fn masks_passwords() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        type_text(&mut app, "hunter2");

        let screen = render(&app, 80, 24);
        assert!(screen.contains("*******"));
        assert!(!screen.contains("hunter2"));
    }
}
