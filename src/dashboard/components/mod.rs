//! Reusable widgets shared by the dashboard screens

pub mod pagination_bar;
pub mod resource_table;
pub mod status_display;

pub use resource_table::TableView;
