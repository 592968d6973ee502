use std::io::Read;
use std::path::Path;

use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::model::config::Config;
use crate::utils::file::file_utils;

fn parse_config(content: &str) -> Result<Config, M3uGeneratorError> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    match serde_yaml::from_str::<Config>(content) {
        Ok(cfg) => Ok(cfg),
        Err(e) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "cant read config file: {}", e),
    }
}

/// Reads and prepares the config. Without an explicit file a missing
/// default `config.yml` means built-in defaults.
pub fn read_config(config_file: Option<&str>) -> Result<Config, M3uGeneratorError> {
    let mut cfg = match config_file {
        Some(file) => read_config_file(Path::new(file))?,
        None => {
            let default_path = file_utils::get_default_config_path();
            if default_path.exists() {
                read_config_file(&default_path)?
            } else {
                Config::default()
            }
        }
    };
    cfg.prepare()?;
    Ok(cfg)
}

fn read_config_file(config_file: &Path) -> Result<Config, M3uGeneratorError> {
    match file_utils::open_file(config_file) {
        Ok(mut file) => {
            let mut content = String::new();
            if let Err(err) = file.read_to_string(&mut content) {
                return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "cant read config file {}: {err}", config_file.to_string_lossy());
            }
            parse_config(&content)
        }
        Err(err) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "cant open config file {}: {err}", config_file.to_string_lossy()),
    }
}
