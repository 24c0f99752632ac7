pub mod app;
pub mod event;
pub mod indicator;
pub mod input;
pub mod list_host;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use indicator::IndicatorHandle;
pub use list_host::ListHost;
pub use theme::Theme;
