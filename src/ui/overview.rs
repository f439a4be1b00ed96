use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::theme;
use crate::app::{App, Panel, Region};
use crate::config::SourceConfig;
use crate::feeds::{FeedId, FeedState};
use crate::format;
use crate::models::{ReferenceKey, ResultSnapshot};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.active_panel == Panel::Overview;
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let block = Block::default()
        .title(" Conformance ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let keys = app.overview_keys();
    let mut items: Vec<ListItem> = Vec::with_capacity(keys.len() + 1);

    items.push(ListItem::new(region_text(
        app,
        &app.branch,
        app.branch
            .key
            .as_ref()
            .map(|key| format!("{} branch results", key))
            .unwrap_or_default(),
    )));

    let version_title = app
        .version
        .key
        .as_ref()
        .map(|key| format!("Latest version ({}) results", key))
        .unwrap_or_else(|| "Latest version results".to_string());
    let version_text = if app.version.key.is_some() {
        region_text(app, &app.version, version_title)
    } else {
        releases_placeholder(app, version_title)
    };
    items.push(ListItem::new(version_text));

    for key in keys.iter().skip(if app.version.key.is_some() { 2 } else { 1 }) {
        items.push(ListItem::new(tag_line(app, key)));
    }

    // The placeholder card for unknown releases is not selectable.
    let selected = match app.version.key {
        Some(_) => app.selected_overview_index,
        None if app.selected_overview_index == 0 => 0,
        None => app.selected_overview_index + 1,
    };
    let mut state = ListState::default();
    if focused {
        state.select(Some(selected));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme::SURFACE1));
    frame.render_stateful_widget(list, area, &mut state);
}

fn region_text<'a>(app: &App, region: &Region, title: String) -> Text<'a> {
    let mut lines = vec![title_line(app, region, title)];

    match &region.series {
        FeedState::Idle | FeedState::Requested => {
            lines.push(loading_line(app));
        }
        FeedState::Failed(err) => lines.push(unavailable_line(err.to_string())),
        FeedState::Succeeded(series) => match series.latest() {
            Ok(latest) => lines.extend(general_info(latest, &app.settings.source)),
            Err(err) => lines.push(unavailable_line(err.to_string())),
        },
    }
    lines.push(Line::from(""));
    Text::from(lines)
}

fn title_line<'a>(app: &App, region: &Region, title: String) -> Line<'a> {
    let mut spans = vec![Span::styled(title, Style::default().fg(theme::TEXT).bold())];
    if region.info_link {
        spans.push(Span::styled("  ⓘ details", Style::default().fg(theme::TEAL)));
    } else if region
        .key
        .as_ref()
        .is_some_and(|key| feed_failed(app, &FeedId::Latest(key.clone())))
    {
        spans.push(Span::styled(
            "  details unavailable",
            Style::default().fg(theme::OVERLAY0),
        ));
    }
    Line::from(spans)
}

fn releases_placeholder<'a>(app: &App, title: String) -> Text<'a> {
    let status = match &app.releases {
        FeedState::Idle | FeedState::Requested => loading_line(app),
        FeedState::Failed(err) => unavailable_line(err.to_string()),
        FeedState::Succeeded(_) => Line::from(Span::styled(
            "  No releases published",
            Style::default().fg(theme::OVERLAY0),
        )),
    };
    Text::from(vec![
        Line::from(Span::styled(title, Style::default().fg(theme::TEXT).bold())),
        status,
        Line::from(""),
    ])
}

/// Latest commit, counters and conformance of the newest run in a series.
fn general_info<'a>(latest: &ResultSnapshot, source: &SourceConfig) -> Vec<Line<'a>> {
    let short: String = latest.commit.chars().take(10).collect();
    let conformance = latest
        .conformance()
        .map(|pct| format!("{}%", pct))
        .unwrap_or_else(|| "n/a".to_string());

    vec![
        Line::from(vec![
            Span::raw("  Latest commit: "),
            Span::styled(short, Style::default().fg(theme::MAUVE)),
        ]),
        Line::from(Span::styled(
            format!("  {}", source.commit_url(&latest.commit)),
            Style::default().fg(theme::OVERLAY0),
        )),
        Line::from(vec![
            Span::raw("  Total: "),
            Span::styled(format::count(latest.total), Style::default().fg(theme::TOTAL)),
            Span::raw("  Passed: "),
            Span::styled(format::count(latest.passed), Style::default().fg(theme::PASSED)),
        ]),
        Line::from(vec![
            Span::raw("  Ignored: "),
            Span::styled(format::count(latest.ignored), Style::default().fg(theme::IGNORED)),
            Span::raw("  Failed: "),
            Span::styled(
                format::maybe_count(latest.failed()),
                Style::default().fg(theme::FAILED),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Conformance: "),
            Span::styled(conformance, Style::default().fg(theme::TEXT).bold()),
        ]),
    ]
}

fn tag_line<'a>(app: &App, key: &ReferenceKey) -> Line<'a> {
    let name = Span::styled(format!("{:<10}", key.display_name()), Style::default().fg(theme::TEXT));
    let status = match app.latest.get(key) {
        Ok(snapshot) => {
            let conformance = snapshot
                .conformance()
                .map(|pct| format!("{:>6.2}%", pct))
                .unwrap_or_else(|| "   n/a ".to_string());
            vec![
                Span::styled(conformance, Style::default().fg(theme::PASSED)),
                Span::styled(
                    format!("  {} / {}", format::count(snapshot.passed), format::count(snapshot.total)),
                    Style::default().fg(theme::SUBTEXT0),
                ),
            ]
        }
        Err(_) if feed_failed(app, &FeedId::Latest(key.clone())) => {
            vec![Span::styled("data unavailable", Style::default().fg(theme::RED))]
        }
        Err(_) => vec![Span::styled(
            theme::spinner(app.spinner_tick),
            Style::default().fg(theme::YELLOW),
        )],
    };

    let mut spans = vec![Span::raw("  "), name];
    spans.extend(status);
    Line::from(spans)
}

fn loading_line<'a>(app: &App) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {} Loading…", theme::spinner(app.spinner_tick)),
        Style::default().fg(theme::YELLOW),
    ))
}

fn unavailable_line<'a>(reason: String) -> Line<'a> {
    Line::from(vec![
        Span::styled("  Data unavailable: ", Style::default().fg(theme::RED)),
        Span::styled(reason, Style::default().fg(theme::OVERLAY0)),
    ])
}

fn feed_failed(app: &App, feed: &FeedId) -> bool {
    matches!(app.feeds.get(feed), Some(FeedState::Failed(_)))
}
