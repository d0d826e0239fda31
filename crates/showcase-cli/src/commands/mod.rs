pub mod config;
pub mod greet;
pub mod rotate;
pub mod simulate;
pub mod submit;
pub mod theme;
