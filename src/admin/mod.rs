//! Admin operations outside the paginated lists
//!
//! Every operation validates its form before touching the network and
//! reports failures as `ApiError`; callers turn those into notices.

pub mod auth;
pub mod brands;
pub mod details;
pub mod password;
pub mod payments;
pub mod settings;
pub mod stats;

pub use auth::{login, logout};
pub use brands::save_brand;
pub use details::{fetch_detail, RecordDetail};
pub use password::reset_password;
pub use payments::{add_transaction, create_payment, lookup, LookupKind, LookupOption};
pub use settings::{
    load_registration_config, load_settings, save_registration_config, save_settings,
};
pub use stats::{fetch_stats, StatsReport};
