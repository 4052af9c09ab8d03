use crate::app::{App, InputBuffer};
use crate::page::Field;
use crate::ui::Layout;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const LABEL_WIDTH: u16 = 12;

pub fn draw_user_form(frame: &mut Frame, area: Rect, app: &App) {
    let form_width = 60u16.min(area.width.saturating_sub(4));
    let form_height = 15u16.min(area.height);
    let form_area = Layout::centered_box(area, form_width, form_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Create User Account ")
        .title_style(app.theme.primary_style().add_modifier(Modifier::BOLD));

    frame.render_widget(Clear, form_area);
    frame.render_widget(block, form_area);

    let inner = form_area.inner(Margin::new(2, 1));
    if inner.height < Field::ALL.len() as u16 * 2 + 1 || inner.width <= LABEL_WIDTH {
        return;
    }

    let mut y = inner.y + 1;
    for field in Field::ALL {
        let focused = app.focus() == field;
        let row = Rect::new(inner.x, y, inner.width, 1);
        draw_label(frame, row, app, field, focused);

        let value_area = Rect::new(
            inner.x + LABEL_WIDTH,
            y,
            inner.width - LABEL_WIDTH,
            1,
        );
        match app.buffer(field) {
            Some(buffer) => draw_text_value(frame, value_area, app, field, buffer, focused),
            None => draw_shell_value(frame, value_area, app, focused),
        }

        y += 2;
    }

    let button_text = " [Enter] Create Account ";
    let button_y = form_area.y + form_area.height.saturating_sub(2);
    frame.render_widget(
        Paragraph::new(button_text).style(app.theme.button_style(app.page.is_ready())),
        Rect::new(inner.x, button_y, button_text.len() as u16, 1).intersection(inner),
    );
}

fn draw_label(frame: &mut Frame, area: Rect, app: &App, field: Field, focused: bool) {
    let style = if focused {
        app.theme.primary_style().add_modifier(Modifier::BOLD)
    } else {
        app.theme.muted_style()
    };
    let marker = if focused { ">" } else { " " };
    frame.render_widget(
        Paragraph::new(format!("{marker} {}", field.label())).style(style),
        Rect::new(area.x, area.y, LABEL_WIDTH, 1),
    );
}

fn field_errored(app: &App, field: Field) -> bool {
    match field {
        Field::Username => app.page.username_error().is_some(),
        Field::Password | Field::PasswordConfirmation => app.page.password_error().is_some(),
        Field::FullName | Field::Shell => false,
    }
}

fn draw_text_value(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    field: Field,
    buffer: &InputBuffer,
    focused: bool,
) {
    let style = app.theme.field_style(focused, field_errored(app, field));
    let shown = buffer.display('*');

    if !focused {
        let line = if shown.is_empty() {
            Span::styled("(empty)", app.theme.muted_style())
        } else {
            Span::styled(shown, style)
        };
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let cursor = buffer.cursor();
    let before: String = shown.chars().take(cursor).collect();
    let after: String = shown.chars().skip(cursor).collect();

    let line = Line::from(vec![
        Span::styled(before, style),
        Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled(after, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_shell_value(frame: &mut Frame, area: Rect, app: &App, focused: bool) {
    let catalog = app.page.shells();
    let position = match app.page.shell_index() {
        Some(i) => format!(" ({}/{})", i + 1, catalog.len()),
        None => String::new(),
    };

    let arrow_style = if focused {
        app.theme.primary_style()
    } else {
        app.theme.muted_style()
    };

    let line = Line::from(vec![
        Span::styled("< ", arrow_style),
        Span::styled(app.page.shell(), app.theme.field_style(focused, false)),
        Span::styled(" >", arrow_style),
        Span::styled(position, app.theme.muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
