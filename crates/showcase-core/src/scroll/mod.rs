//! Smooth anchor scrolling
//!
//! - `easing` - pure easing curves
//! - `timing` - progress and interpolation over an explicit clock
//! - `config` - `ScrollConfig` helpers
//! - `anchor` - in-page link resolution
//! - `animation` - controller combining the above
//!
//! ```ignore
//! use showcase_core::scroll::{anchor_id, anchor_target, ScrollAnimator};
//!
//! let mut animator = ScrollAnimator::new(config.scroll.clone());
//! if let Some(id) = anchor_id("#work") {
//!     animator.scroll_to(anchor_target(section_top, 72.0, max), max, now);
//! }
//! // on every animation frame
//! let y = animator.update(frame_time);
//! ```

pub mod anchor;
pub mod animation;
pub mod config;
pub mod easing;
pub mod timing;

pub use anchor::{anchor_id, anchor_target};
pub use animation::ScrollAnimator;
pub use config::ScrollConfig;
pub use easing::EasingType;
