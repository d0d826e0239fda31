//! Reveal/motion coordinator
//!
//! Decides when each `.reveal` element plays its entrance animation, keeps
//! the navigation highlight in sync with the visible section, and runs the
//! continuous effects (rotation, parallax, pointer glow, smooth anchor
//! scrolling), all gated behind the user's reduced-motion preference.
//!
//! The page is reached only through the [`Platform`] traits:
//!
//! - [`IntersectionSource`] - visibility subscriptions
//! - [`TimerHost`] - repeating timers and frame requests
//! - [`MotionQuery`] - the reduced-motion signal
//!
//! [`VirtualPlatform`] implements all three deterministically; the
//! [`runtime::TokioTimers`] host runs real timers on tokio.

pub mod active_section;
pub mod coordinator;
pub mod effects;
pub mod element;
pub mod geometry;
pub mod observer;
pub mod rotation;
pub mod runtime;
pub mod timer;
pub mod virtual_platform;

pub use active_section::ActiveSectionTracker;
pub use coordinator::{MotionCoordinator, MotionEvent};
pub use effects::{GlowPoint, ParallaxLayer};
pub use element::{stagger_delay, AnimatableElement, RevealTarget};
pub use geometry::{intersection_ratio, Rect, RootMargin};
pub use observer::{
    ElementId, IntersectionEntry, IntersectionSource, ObserverOptions, SectionId, SubscriptionId,
    Target,
};
pub use rotation::Rotator;
pub use timer::{FrameHandle, FrameSlot, TimerHandle, TimerHost};
pub use virtual_platform::{TimerTick, VirtualPlatform};

/// The platform's reduced-motion signal
///
/// Queried at every animation decision; never cached by the coordinator.
pub trait MotionQuery {
    /// `false` when the user asked for reduced motion
    fn motion_allowed(&self) -> bool;
}

/// Everything the coordinator needs from its host
pub trait Platform: IntersectionSource + TimerHost + MotionQuery {}

impl<T: IntersectionSource + TimerHost + MotionQuery> Platform for T {}
