//! Viewport geometry for intersection ratios
//!
//! Rectangles are in page coordinates (CSS pixels, y grows downward).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Overlapping region, `None` when the rectangles do not touch
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Fractions of the root size trimmed from each edge
///
/// Equivalent to a CSS `rootMargin` with negative percentages:
/// `'-32% 0px -46% 0px'` is `RootMargin::vertical(0.32, 0.46)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const NONE: RootMargin = RootMargin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn vertical(top: f64, bottom: f64) -> Self {
        Self {
            top,
            bottom,
            ..Self::NONE
        }
    }

    /// Shrink `root` by the configured fractions
    pub fn apply(&self, root: Rect) -> Rect {
        let left = root.left + root.width * self.left;
        let top = root.top + root.height * self.top;
        let right = root.right() - root.width * self.right;
        let bottom = root.bottom() - root.height * self.bottom;
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Visible fraction of `target` inside `root` after applying `margin`
///
/// Returns `(ratio, is_intersecting)`. A zero-area target that touches the
/// root counts as fully visible.
pub fn intersection_ratio(target: &Rect, root: &Rect, margin: &RootMargin) -> (f64, bool) {
    let root = margin.apply(*root);
    match target.intersection(&root) {
        Some(overlap) => {
            let area = target.area();
            if area <= 0.0 {
                (1.0, true)
            } else {
                ((overlap.area() / area).clamp(0.0, 1.0), true)
            }
        }
        None => (0.0, false),
    }
}
