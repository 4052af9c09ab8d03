use crate::app::App;
use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let now = Local::now();
    let time = now.format("%H:%M").to_string();

    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "localhost".to_string());

    let mut left_spans = vec![
        Span::raw(" "),
        Span::styled(
            app.config.general.title.as_str(),
            app.theme.primary_style().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.config.general.subtitle.as_str(), app.theme.muted_style()),
    ];
    if app.is_dryrun() {
        left_spans.push(Span::styled(" [DRYRUN]", app.theme.error_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(left_spans)), area);

    let right = Paragraph::new(Line::from(vec![
        Span::styled(hostname, app.theme.secondary_style()),
        Span::raw("  "),
        Span::styled(time, app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, area);
}
