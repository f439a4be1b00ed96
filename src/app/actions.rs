use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::InputRequest;

use crate::{
    app::{App, Panel},
    browser,
    models::Row,
};

#[derive(Debug)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrevious,
    NavigateUp,
    NavigateDown,
    ScrollUp,
    ScrollDown,
    Expand,
    Collapse,
    CollapseAll,
    JumpToStart,
    JumpToEnd,
    Select,
    OpenSource,
    CopyLink,
    CloseDetail,
    FilterEnter,
    FilterInput(char),
    FilterBackspace,
    FilterExit,
    FilterApply,
}

/// Process a keyboard action.
pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,

        Action::FocusNext => {
            app.active_panel = match app.active_panel {
                Panel::Overview => Panel::Results,
                Panel::Results => Panel::Detail,
                Panel::Detail => Panel::Overview,
            };
        }

        Action::FocusPrevious => {
            app.active_panel = match app.active_panel {
                Panel::Overview => Panel::Detail,
                Panel::Results => Panel::Overview,
                Panel::Detail => Panel::Results,
            };
        }

        Action::NavigateUp => match app.active_panel {
            Panel::Overview => {
                app.selected_overview_index = app.selected_overview_index.saturating_sub(1);
            }
            Panel::Results => {
                app.selected_row_index = app.selected_row_index.saturating_sub(1);
                app.detail_scroll_offset = 0;
                app.adjust_rows_scroll();
            }
            Panel::Detail => {
                app.detail_scroll_offset = app.detail_scroll_offset.saturating_sub(1);
            }
        },

        Action::NavigateDown => match app.active_panel {
            Panel::Overview => {
                let max = app.overview_keys().len().saturating_sub(1);
                app.selected_overview_index = (app.selected_overview_index + 1).min(max);
            }
            Panel::Results => {
                let max = app.visible_rows().len().saturating_sub(1);
                app.selected_row_index = (app.selected_row_index + 1).min(max);
                app.detail_scroll_offset = 0;
                app.adjust_rows_scroll();
            }
            Panel::Detail => {
                app.detail_scroll_offset = app.detail_scroll_offset.saturating_add(1);
            }
        },

        Action::ScrollUp => {
            let half = (app.rows_viewport_height / 2).max(1);
            match app.active_panel {
                Panel::Results => {
                    app.selected_row_index = app.selected_row_index.saturating_sub(half);
                    app.detail_scroll_offset = 0;
                    app.adjust_rows_scroll();
                }
                Panel::Detail => {
                    app.detail_scroll_offset = app.detail_scroll_offset.saturating_sub(half as u16);
                }
                Panel::Overview => {}
            }
        }

        Action::ScrollDown => {
            let half = (app.rows_viewport_height / 2).max(1);
            match app.active_panel {
                Panel::Results => {
                    let max = app.visible_rows().len().saturating_sub(1);
                    app.selected_row_index = (app.selected_row_index + half).min(max);
                    app.detail_scroll_offset = 0;
                    app.adjust_rows_scroll();
                }
                Panel::Detail => {
                    app.detail_scroll_offset = app.detail_scroll_offset.saturating_add(half as u16);
                }
                Panel::Overview => {}
            }
        }

        Action::Expand => {
            if app.active_panel == Panel::Results
                && let Some(Row::Suite(id)) = app.selected_row()
                && let Some(detail) = app.detail.as_mut()
            {
                detail.tree.toggle_expanded(id);
                app.clamp_selection();
            }
        }

        Action::Collapse => {
            if app.active_panel == Panel::Results
                && let Some(row) = app.selected_row()
                && let Some(detail) = app.detail.as_mut()
            {
                let target = match row {
                    Row::Suite(id)
                        if detail.tree.get(id).is_some_and(|n| n.expanded) =>
                    {
                        Some(id)
                    }
                    Row::Suite(id) => detail.tree.parent(id),
                    Row::Test { suite, .. } => Some(suite),
                };
                if let Some(target) = target {
                    detail.tree.collapse(target);
                    // Collapse navigates to the collapsed suite
                    if let Some(pos) = app
                        .visible_rows()
                        .iter()
                        .position(|&(row, _)| row == Row::Suite(target))
                    {
                        app.selected_row_index = pos;
                    }
                    app.adjust_rows_scroll();
                }
            }
        }

        Action::CollapseAll => {
            if app.active_panel == Panel::Results
                && let Some(detail) = app.detail.as_mut()
            {
                detail.tree.collapse_all();
                app.selected_row_index = 0;
                app.rows_scroll_offset = 0;
            }
        }

        Action::JumpToStart => match app.active_panel {
            Panel::Overview => app.selected_overview_index = 0,
            Panel::Results => {
                app.selected_row_index = 0;
                app.rows_scroll_offset = 0;
                app.detail_scroll_offset = 0;
            }
            Panel::Detail => app.detail_scroll_offset = 0,
        },

        Action::JumpToEnd => match app.active_panel {
            Panel::Overview => {
                app.selected_overview_index = app.overview_keys().len().saturating_sub(1);
            }
            Panel::Results => {
                app.selected_row_index = app.visible_rows().len().saturating_sub(1);
                app.detail_scroll_offset = 0;
                app.adjust_rows_scroll();
            }
            Panel::Detail => app.detail_scroll_offset = u16::MAX,
        },

        Action::Select => match app.active_panel {
            Panel::Overview => {
                if let Some(key) = app.selected_overview_key() {
                    app.request_details(key);
                }
            }
            Panel::Results => match app.selected_row() {
                Some(Row::Suite(_)) => handle_action(app, Action::Expand),
                Some(Row::Test { .. }) => handle_action(app, Action::OpenSource),
                None => {}
            },
            Panel::Detail => {}
        },

        Action::OpenSource => {
            if let Some(link) = app.selected_test().map(|t| t.link.clone()) {
                app.pending_open = Some(link);
            }
        }

        Action::CopyLink => {
            if let Some(link) = app.selected_test().map(|t| t.link.clone()) {
                match browser::copy(&link) {
                    Ok(()) => app.notifier.info("Link copied", 2),
                    Err(e) => app.notifier.error(e.to_string()),
                }
            }
        }

        Action::CloseDetail => {
            app.detail = None;
            app.selected_row_index = 0;
            app.rows_scroll_offset = 0;
            app.active_panel = Panel::Overview;
        }

        Action::FilterEnter => {
            if app.detail.is_some() {
                app.filter_active = true;
                app.active_panel = Panel::Results;
            }
        }

        Action::FilterInput(c) => {
            app.filter.handle(InputRequest::InsertChar(c));
            app.selected_row_index = 0;
            app.rows_scroll_offset = 0;
        }

        Action::FilterBackspace => {
            app.filter.handle(InputRequest::DeletePrevChar);
            app.clamp_selection();
        }

        Action::FilterExit => {
            app.filter.reset();
            app.filter_active = false;
            app.clamp_selection();
        }

        Action::FilterApply => {
            app.filter_active = false;
        }
    }
}

pub fn trigger_action(key: KeyEvent, filter_active: bool) -> Option<Action> {
    if filter_active {
        match key.code {
            KeyCode::Esc => Some(Action::FilterExit),
            KeyCode::Enter => Some(Action::FilterApply),
            KeyCode::Backspace => Some(Action::FilterBackspace),
            KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Char(c) => Some(Action::FilterInput(c)),
            _ => None,
        }
    } else {
        map_key(key)
    }
}

fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('u') => Some(Action::ScrollUp),
            KeyCode::Char('d') => Some(Action::ScrollDown),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrevious),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Expand),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Collapse),
        KeyCode::Char('H') => Some(Action::CollapseAll),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::JumpToStart),
        KeyCode::Char('G') | KeyCode::End => Some(Action::JumpToEnd),
        KeyCode::Enter | KeyCode::Char('i') => Some(Action::Select),
        KeyCode::Char('o') => Some(Action::OpenSource),
        KeyCode::Char('y') => Some(Action::CopyLink),
        KeyCode::Esc => Some(Action::CloseDetail),
        KeyCode::Char('f') | KeyCode::Char('/') => Some(Action::FilterEnter),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        _ => None,
    }
}

impl App {
    /// Keep the selection inside the visible rows after the tree changed shape.
    fn clamp_selection(&mut self) {
        let max = self.visible_rows().len().saturating_sub(1);
        self.selected_row_index = self.selected_row_index.min(max);
        self.adjust_rows_scroll();
    }
}
