use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::model::config_sort::SortMode;
use crate::utils::default_utils::default_as_true;

pub const DEFAULT_SOURCE_NAME: &str = "roku";
pub const DEFAULT_CATALOG_URL: &str = "https://i.mjh.nz/Roku/.channels.json";
pub const DEFAULT_EPG_URL: &str = "https://github.com/matthuisman/i.mjh.nz/raw/master/Roku/all.xml.gz";
pub const DEFAULT_FILENAME: &str = "roku_all.m3u";

fn default_epg_url() -> String { String::from(DEFAULT_EPG_URL) }

/// One channel catalog and the playlist file generated from it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSource {
    pub name: String,
    /// Catalog location, a url or a file path relative to the working dir.
    pub url: String,
    #[serde(default = "default_as_true")]
    pub gzip: bool,
    /// Written verbatim into the `url-tvg` header attribute, never fetched.
    #[serde(default = "default_epg_url")]
    pub epg_url: String,
    #[serde(default)]
    pub sort: SortMode,
    pub filename: String,
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_SOURCE_NAME),
            url: String::from(DEFAULT_CATALOG_URL),
            gzip: true,
            epg_url: default_epg_url(),
            sort: SortMode::default(),
            filename: String::from(DEFAULT_FILENAME),
        }
    }
}

impl ConfigSource {
    pub fn prepare(&mut self) -> Result<(), M3uGeneratorError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "source name is empty");
        }
        if self.url.trim().is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "source {} has no url", self.name);
        }
        if self.filename.trim().is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "source {} has no filename", self.name);
        }
        self.url = self.url.trim().to_string();
        self.epg_url = self.epg_url.trim().to_string();
        if self.epg_url.is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "source {} has no epg_url", self.name);
        }
        Ok(())
    }
}
