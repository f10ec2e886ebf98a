mod loader;
mod store;
mod types;

pub use loader::ConfigError;
pub use store::ConfigStore;
pub use types::{
    ChannelConfig, Config, DeepLinkConfig, DuplicateObserverSetting, LoggingConfig,
    NavigationConfig, TaskConfig,
};
