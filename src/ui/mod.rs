mod detail_panel;
mod layout;
mod notifications;
mod overview;
mod results_tree;
mod search_box;
mod status_bar;
pub mod theme;

pub use layout::draw;
