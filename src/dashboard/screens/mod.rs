//! Dashboard screens

pub mod detail;
pub mod list;
pub mod menu;
pub mod settings;
pub mod stats;

pub use detail::DetailScreen;
pub use list::ResourceListScreen;
pub use menu::MenuScreen;
pub use settings::SettingsScreen;
pub use stats::StatsScreen;
