use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_message_panel(frame: &mut Frame, area: Rect, app: &App) {
    if area.is_empty() {
        return;
    }

    // App messages win over the page's validation message
    let (text, is_error) = match (&app.message, app.page.message()) {
        (Some(m), _) => (m.text.as_str(), m.is_error),
        (None, Some(validation)) => (validation, true),
        (None, None) => return,
    };

    let (title, border_style, text_style) = if is_error {
        (" Error ", app.theme.error_style(), app.theme.error_style())
    } else {
        (" Info ", app.theme.secondary_style(), app.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(Span::styled(text, text_style))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
