mod pull_indicator;
mod refresh_list;
mod status_bar;

pub use pull_indicator::PullIndicatorWidget;
pub use refresh_list::RefreshListWidget;
pub use status_bar::StatusBarWidget;
