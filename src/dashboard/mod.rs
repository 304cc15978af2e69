//! Terminal dashboard
//!
//! A menu of listings, each opened as a paginated list screen driven by
//! `PagedResourceList`, plus record detail, analytics and settings screens.

pub mod app;
pub mod components;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;
pub use traits::{ListScreen, Screen, ScreenAction};
