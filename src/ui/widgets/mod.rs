mod form;
mod header;
mod message_panel;
mod status_bar;

pub use form::draw_user_form;
pub use header::draw_header;
pub use message_panel::draw_message_panel;
pub use status_bar::draw_status_bar;

use crate::ui::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Block;

pub fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(theme.style());
    frame.render_widget(block, area);
}
