mod error;
mod provider;
mod store;


pub use error::ConfigError;
pub use provider::{SettingsProvider, SharedSettings};
pub use store::{APP_NAME, CONFIG_NAME, LootSettingsExt};

pub use kwyd_types::LootSettings;
