//! Page behaviors outside the motion coordinator

pub mod contact;
pub mod disclosure;
pub mod greeting;
pub mod nav;
pub mod theme;

pub use contact::{
    ContactForm, ContactSubmission, FormStatus, FormTransport, HttpTransport, TransportOutcome,
};
pub use disclosure::{Disclosure, ModalSet};
pub use greeting::{footer_year, greeting_at, greeting_for_hour, greeting_now, DayPeriod};
pub use nav::NavMenu;
pub use theme::{FileThemeStore, Theme, ThemeController, ThemeStore, STORAGE_KEY};
