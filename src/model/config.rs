use std::collections::HashSet;

use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::model::config_log::LogConfig;
use crate::model::config_provider::ConfigProvider;
use crate::model::config_source::ConfigSource;
use crate::utils::file::file_utils;

fn default_sources() -> Vec<ConfigSource> { vec![ConfigSource::default()] }

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub working_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    #[serde(default)]
    pub provider: ConfigProvider,
    #[serde(default = "default_sources")]
    pub sources: Vec<ConfigSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: String::new(),
            log: None,
            provider: ConfigProvider::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn prepare(&mut self) -> Result<(), M3uGeneratorError> {
        self.working_dir = file_utils::get_working_path(&self.working_dir)?;
        self.provider.prepare()?;
        if self.sources.is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "no sources defined");
        }
        let mut filenames = HashSet::new();
        for source in &mut self.sources {
            source.prepare()?;
            if !filenames.insert(source.filename.clone()) {
                return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info,
                    "filename {} is used by more than one source", source.filename);
            }
        }
        Ok(())
    }

    pub fn get_log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|l| l.log_level.as_deref())
    }
}
