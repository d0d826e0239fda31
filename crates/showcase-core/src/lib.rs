pub mod config;
pub mod error;
pub mod motion;
pub mod scenario;
pub mod scroll;
pub mod site;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use motion::{MotionCoordinator, MotionEvent, Platform, VirtualPlatform};
pub use scenario::{PageEvent, Scenario, SimulationReport};
