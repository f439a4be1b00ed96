use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::results_tree::counter_spans;
use super::theme;
use crate::app::{App, Panel};
use crate::models::Row;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.active_panel == Panel::Detail;
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = match (&app.detail, app.selected_row()) {
        (Some(detail), Some(row)) => {
            let tree = &detail.tree;
            let suite_id = match row {
                Row::Suite(id) | Row::Test { suite: id, .. } => id,
            };
            let mut lines: Vec<Line> = Vec::new();

            let mut breadcrumbs = tree.breadcrumbs(suite_id).join(" > ");
            if let Row::Test { suite, index } = row
                && let Some(test) = tree.test(suite, index)
            {
                breadcrumbs = format!("{} > {}", breadcrumbs, test.name);
            }
            lines.push(Line::from(Span::styled(
                breadcrumbs,
                Style::default().fg(theme::OVERLAY0).bold(),
            )));
            lines.push(Line::from(""));

            match row {
                Row::Suite(id) => {
                    if let Some(node) = tree.get(id) {
                        lines.push(Line::from(vec![
                            Span::styled("Namespace: ", Style::default().fg(theme::SUBTEXT0)),
                            Span::raw(node.namespace.clone()),
                        ]));
                        let mut counters = vec![Span::styled(
                            "Passed / ignored / failed / total: ",
                            Style::default().fg(theme::SUBTEXT0),
                        )];
                        counters.extend(counter_spans(&node.formatted));
                        lines.push(Line::from(counters));
                        if !node.counters.is_consistent() {
                            lines.push(Line::from(""));
                            lines.push(Line::from(Span::styled(
                                "⚠ passed + ignored exceeds total in the published results",
                                Style::default().fg(theme::PEACH),
                            )));
                        }
                    }
                }
                Row::Test { suite, index } => {
                    if let Some(test) = tree.test(suite, index) {
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("{} ", test.outcome.icon()),
                                Style::default().fg(test.outcome.color()),
                            ),
                            Span::styled(test.name.clone(), Style::default().fg(test.outcome.color())),
                        ]));
                        lines.push(Line::from(""));
                        lines.push(Line::from(Span::styled(
                            test.link.clone(),
                            Style::default().fg(theme::BLUE).underlined(),
                        )));
                        lines.push(Line::from(""));
                        lines.push(Line::from(vec![
                            Span::styled("[o]", Style::default().fg(theme::YELLOW)),
                            Span::raw(" open source  "),
                            Span::styled("[y]", Style::default().fg(theme::YELLOW)),
                            Span::raw(" copy link"),
                        ]));
                    }
                }
            }
            Text::from(lines)
        }
        (Some(detail), None) => Text::from(format!(
            "No suites in the results for {}.",
            detail.key
        )),
        (None, _) => Text::from("Select a suite to view details."),
    };

    let content_height = content.height() as u16;
    let max_scroll = content_height.saturating_sub(inner.height);
    app.detail_scroll_offset = app.detail_scroll_offset.min(max_scroll);

    let paragraph = Paragraph::new(content)
        .wrap(ratatui::widgets::Wrap { trim: false })
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(paragraph, inner);
}
