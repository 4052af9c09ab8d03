use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    // Short terminals squeeze the bar to nothing
    if area.is_empty() {
        return;
    }

    let ready_span = if app.page.is_ready() {
        Span::styled(" READY ", app.theme.success_style().add_modifier(Modifier::BOLD | Modifier::REVERSED))
    } else {
        Span::styled(" INCOMPLETE ", app.theme.muted_style().add_modifier(Modifier::REVERSED))
    };

    let left = Line::from(vec![
        Span::raw(" "),
        ready_span,
        Span::raw(" "),
        Span::styled(app.status_bar.left_hint.as_str(), app.theme.muted_style()),
    ]);
    frame.render_widget(Paragraph::new(left).style(app.theme.style()), area);

    let right = Line::from(vec![
        Span::styled(app.status_bar.right_hint.as_str(), app.theme.muted_style()),
        Span::raw(" "),
    ]);
    let right_width = right.width() as u16;
    if area.width > right_width {
        let right_area = Rect {
            x: area.x + area.width - right_width,
            y: area.y,
            width: right_width,
            height: 1,
        }
        .intersection(area);
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), right_area);
    }
}
