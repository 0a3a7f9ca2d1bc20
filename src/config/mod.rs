#[allow(clippy::module_inception)]
pub mod config;

pub use config::{
    config_path, load_config, load_config_from, load_effective_config, mask_secret, save_config,
    save_config_to, Config, MirrorSettings, CONFIG_KEYS,
};
