use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, NotificationKind};

use super::theme;

/// Toast in the bottom-right corner, above the status bar.
pub fn draw(frame: &mut Frame, app: &App) {
    let Some(notification) = app.notifier.recent() else {
        return;
    };

    let (title, color) = match notification.kind {
        NotificationKind::Info => (" ℹ ", theme::TEAL),
        NotificationKind::Error => (" ✗ ", theme::RED),
    };

    let screen = frame.area();
    let width = (notification.message.chars().count() as u16 + 4).min(screen.width / 2).max(12);
    let area = Rect {
        x: screen.width.saturating_sub(width + 1),
        y: screen.height.saturating_sub(4),
        width,
        height: 3.min(screen.height),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(notification.message.as_str())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(theme::TEXT).bg(theme::SURFACE0))
        .block(block);

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
