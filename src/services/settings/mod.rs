mod service;

pub use service::{default_cache_path, default_config_path, SettingsService};
