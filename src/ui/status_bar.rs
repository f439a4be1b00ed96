use ratatui::{prelude::*, widgets::Paragraph};

use super::theme;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let bar = if app.filter_active {
        Line::from(vec![
            Span::styled(" [esc]", Style::default().fg(theme::YELLOW)),
            Span::raw(" clear  "),
            Span::styled("[enter]", Style::default().fg(theme::YELLOW)),
            Span::raw(" apply"),
        ])
    } else {
        let mut spans = vec![
            Span::styled(" [enter]", Style::default().fg(theme::YELLOW)),
            Span::raw(" open  "),
            Span::styled("[tab]", Style::default().fg(theme::YELLOW)),
            Span::raw(" focus  "),
            Span::styled("[f]", Style::default().fg(theme::YELLOW)),
            Span::raw(" filter  "),
            Span::styled("[o]", Style::default().fg(theme::YELLOW)),
            Span::raw(" source  "),
            Span::styled("[esc]", Style::default().fg(theme::YELLOW)),
            Span::raw(" close  "),
            Span::styled("[q]", Style::default().fg(theme::YELLOW)),
            Span::raw(" quit"),
        ];

        let (settled, total) = app.feed_progress();
        if app.loading() {
            spans.push(Span::styled(
                format!("  {} loading {}/{}", theme::spinner(app.spinner_tick), settled, total),
                Style::default().fg(theme::YELLOW),
            ));
        } else if total > 0 {
            spans.push(Span::styled(
                format!("  {}/{} feeds", settled, total),
                Style::default().fg(theme::OVERLAY0),
            ));
        }

        if let Some(releases) = app.releases.value() {
            spans.push(Span::styled(
                format!("  {} releases, {} cached", releases.len(), app.latest.len()),
                Style::default().fg(theme::OVERLAY0),
            ));
        }

        let failed = app
            .feeds
            .values()
            .filter(|f| matches!(f, crate::feeds::FeedState::Failed(_)))
            .count();
        if failed > 0 {
            spans.push(Span::styled(
                format!("  ✘ {} unavailable", failed),
                Style::default().fg(theme::RED),
            ));
        }

        Line::from(spans)
    };

    let paragraph = Paragraph::new(bar).style(Style::default().bg(theme::SURFACE0));
    frame.render_widget(paragraph, area);
}
