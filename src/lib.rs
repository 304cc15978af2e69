//! Admin client for an influencer marketplace API
//!
//! The core is [`list::PagedResourceList`], a generic controller for the
//! paginated listings (influencers, clients, payments, KYC, ...). Listings are
//! described by [`resources::Resource`] descriptors and fed through a
//! [`source::ResourceSource`]. The `infludash` binary drives it from the
//! command line and `infludash-tui` from a terminal dashboard.

pub mod admin;
pub mod api;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod forms;
pub mod list;
pub mod models;
pub mod pagination;
pub mod resources;
pub mod source;
pub mod status;

pub use error::ApiError;
pub use list::{Dispatch, ListEvent, PagedResourceList};
