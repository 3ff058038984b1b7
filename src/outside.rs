//! Outside-interaction guard for the suggestion panel.
//!
//! The host reports pointer-downs with the region the widget occupies. A
//! press outside that region closes the panel; a press inside, or any press
//! while the panel is already closed, does nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Tracks the widget region and decides whether a press dismisses the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutsideGuard {
    region: Option<Rect>,
}

impl OutsideGuard {
    pub fn new(region: Rect) -> Self {
        Self {
            region: Some(region),
        }
    }

    pub fn set_region(&mut self, region: Rect) {
        self.region = Some(region);
    }

    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    /// Whether a press at `point` lands outside the widget.
    ///
    /// Without a known region nothing counts as outside.
    pub fn is_outside(&self, point: Point) -> bool {
        self.region.is_some_and(|region| !region.contains(point))
    }

    /// Run `dismiss` if the panel is open and the press lands outside.
    ///
    /// Returns whether `dismiss` ran.
    pub fn on_pointer_down(&self, point: Point, panel_open: bool, dismiss: impl FnOnce()) -> bool {
        if panel_open && self.is_outside(point) {
            dismiss();
            true
        } else {
            false
        }
    }
}
