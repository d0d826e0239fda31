//! Continuous pointer and scroll effects

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub name: String,
    /// Fraction of the scroll distance the layer lags behind
    pub speed: f64,
}

impl ParallaxLayer {
    pub fn new(name: impl Into<String>, speed: f64) -> Self {
        Self {
            name: name.into(),
            speed,
        }
    }

    /// Vertical translation in pixels for the given scroll position
    #[inline]
    pub fn offset(&self, scroll_y: f64) -> f64 {
        -(scroll_y * self.speed)
    }
}

/// Pointer position inside a card, in percent of its size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowPoint {
    pub x: f64,
    pub y: f64,
}

impl GlowPoint {
    pub const CENTER: GlowPoint = GlowPoint { x: 50.0, y: 50.0 };

    /// Glow origin for a pointer at page coordinates `(x, y)` over `card`
    pub fn from_pointer(card: &Rect, x: f64, y: f64) -> Self {
        Self {
            x: percent_along(x - card.left, card.width),
            y: percent_along(y - card.top, card.height),
        }
    }
}

fn percent_along(offset: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 50.0;
    }
    (offset / extent * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallax_offset_opposes_scroll() {
        let layer = ParallaxLayer::new("backdrop", 0.25);
        assert_eq!(layer.offset(400.0), -100.0);
        assert_eq!(layer.offset(0.0), 0.0);
    }

    #[test]
    fn test_glow_point_relative_and_clamped() {
        let card = Rect::new(100.0, 200.0, 200.0, 100.0);
        assert_eq!(GlowPoint::from_pointer(&card, 150.0, 275.0), GlowPoint { x: 25.0, y: 75.0 });
        assert_eq!(GlowPoint::from_pointer(&card, 0.0, 900.0), GlowPoint { x: 0.0, y: 100.0 });
    }

    #[test]
    fn test_glow_point_degenerate_card() {
        let card = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(GlowPoint::from_pointer(&card, 5.0, 5.0), GlowPoint::CENTER);
    }
}
