pub mod hints;
pub mod openapi;
pub mod serve;

use anyhow::Result;
use std::path::Path;
use typedroutes_core::TypedRoutesConfig;

/// Load configuration from `path`, or the default file and environment
pub fn load_config(path: Option<&Path>) -> Result<TypedRoutesConfig> {
    match path {
        Some(path) => {
            let mut config = TypedRoutesConfig::from_file(path)?;
            config.apply_env_vars();
            Ok(config)
        }
        None => TypedRoutesConfig::load(),
    }
}
