//! Animation atoms used by the refresh controller.
//!
//! - `easing` - curves mapping [0, 1] to [0, 1], including a damped spring
//! - `timing` - progress and interpolation over `tokio::time::Instant`
//! - `inset` - a single inset/offset animation with its completion tag

pub mod easing;
pub mod inset;
pub mod timing;

pub use easing::{Curve, EasingTypeExt};
pub use inset::{Completion, InsetAnimation, ScrollMetrics};
