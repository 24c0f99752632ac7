pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod indicator;
pub mod scroll_view;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AppConfig, EasingType, RefreshConfig};
pub use controller::{RefreshAction, RefreshController};
pub use error::{Error, Result};
pub use geometry::{Insets, Point, Rect, Size};
pub use host::{IndicatorLayer, ObserverId, ObserverSet, ScrollEvent, ScrollHost, ScrollObserver};
pub use indicator::{ProgressAnimator, ProgressView, RefreshViewAnimator};
pub use scroll_view::ScrollView;
pub use state::{PullSample, RefreshStateMachine, State, Transition};
