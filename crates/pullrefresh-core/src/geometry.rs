//! Plain geometry values shared between the controller and scroll hosts.
//!
//! All values are in host units (points on a touch screen, rows in a
//! terminal). The y axis grows downward, so pulling content down past its
//! resting edge produces a negative content offset.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Bottom edge (`y + height`)
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Same rect moved by `dx`/`dy`
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Padding around the scrollable content
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Insets with only the top edge set
    pub const fn top(top: f64) -> Self {
        Self::new(top, 0.0, 0.0, 0.0)
    }

    /// Copy with a different top edge
    pub fn with_top(self, top: f64) -> Self {
        Self { top, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_helpers() {
        let rect = Rect::new(1.0, -3.0, 40.0, 3.0);
        assert_eq!(rect.max_y(), 0.0);
        assert_eq!(rect.offset_by(2.0, 5.0), Rect::new(3.0, 2.0, 40.0, 3.0));
    }

    #[test]
    fn test_insets_with_top() {
        let insets = Insets::new(4.0, 1.0, 2.0, 1.0).with_top(64.0);
        assert_eq!(insets, Insets::new(64.0, 1.0, 2.0, 1.0));
        assert_eq!(Insets::top(10.0).bottom, 0.0);
    }
}
