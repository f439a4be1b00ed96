use ratatui::prelude::*;

use crate::app::App;

use super::detail_panel;
use super::notifications;
use super::overview;
use super::results_tree;
use super::search_box;
use super::status_bar;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let [left_area, right_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(main_area);

    let [tree_area, detail_area] =
        Layout::vertical([Constraint::Percentage(65), Constraint::Percentage(35)])
            .areas(right_area);

    overview::draw(frame, app, left_area);
    if app.filter_active || !app.filter.value().is_empty() {
        let [search_area, filtered_tree_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(tree_area);
        search_box::draw(frame, app.filter.value(), app.filter_active, search_area);
        results_tree::draw(frame, app, filtered_tree_area);
    } else {
        results_tree::draw(frame, app, tree_area);
    }
    detail_panel::draw(frame, app, detail_area);
    status_bar::draw(frame, app, status_area);
    notifications::draw(frame, app);
}
