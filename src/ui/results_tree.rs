use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::theme;
use crate::{
    app::{App, Panel},
    models::{Row, tree::FormattedCounters},
};

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.active_panel == Panel::Results;
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let title = match (&app.detail, &app.detail_loading) {
        (_, Some(key)) => format!(" Results: {} {} ", key, theme::spinner(app.spinner_tick)),
        (Some(detail), None) => format!(" Results: {} ", detail.key),
        (None, None) => " Results ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    // Calculate viewport height (inner area minus borders)
    let inner_height = block.inner(area).height as usize;
    app.rows_viewport_height = inner_height;

    let Some(detail) = &app.detail else {
        let hint = Paragraph::new("Select a branch or version and press enter to show its results.")
            .style(Style::default().fg(theme::OVERLAY0))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let visible = app.visible_rows();
    let start = app.rows_scroll_offset.min(visible.len());
    let end = (start + inner_height).min(visible.len());
    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .enumerate()
        .map(|(view_i, &(row, depth))| {
            let absolute_i = view_i + start;
            let selected = absolute_i == app.selected_row_index && focused;
            let indent = "  ".repeat(depth);

            let mut spans = vec![Span::raw(indent)];
            match row {
                Row::Suite(id) => {
                    let Some(node) = detail.tree.get(id) else {
                        return ListItem::new("");
                    };
                    let icon = match (node.expandable, node.expanded) {
                        (false, _) => "  ",
                        (true, true) => "▼ ",
                        (true, false) => "▶ ",
                    };
                    let name_color = if node.counters.is_consistent() {
                        theme::TEXT
                    } else {
                        theme::PEACH
                    };
                    spans.push(Span::styled(icon, Style::default().fg(theme::OVERLAY0)));
                    spans.push(Span::styled(node.name.clone(), Style::default().fg(name_color)));
                    spans.push(Span::raw("  "));
                    spans.extend(counter_spans(&node.formatted));
                }
                Row::Test { suite, index } => {
                    let Some(test) = detail.tree.test(suite, index) else {
                        return ListItem::new("");
                    };
                    let color = test.outcome.color();
                    spans.push(Span::styled(
                        format!("{} ", test.outcome.icon()),
                        Style::default().fg(color),
                    ));
                    spans.push(Span::styled(test.name.clone(), Style::default().fg(color)));
                }
            }

            let item = ListItem::new(Line::from(spans));
            if selected {
                item.style(Style::default().bg(theme::SURFACE1))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

/// `passed / ignored / failed / total`, each in its own color.
pub(super) fn counter_spans(counters: &FormattedCounters) -> Vec<Span<'static>> {
    vec![
        Span::styled(counters.passed.clone(), Style::default().fg(theme::PASSED)),
        Span::raw(" / "),
        Span::styled(counters.ignored.clone(), Style::default().fg(theme::IGNORED)),
        Span::raw(" / "),
        Span::styled(counters.failed.clone(), Style::default().fg(theme::FAILED)),
        Span::raw(" / "),
        Span::styled(counters.total.clone(), Style::default().fg(theme::TOTAL)),
    ]
}
