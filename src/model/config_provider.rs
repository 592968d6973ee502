use url::Url;

use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::utils::default_utils::{default_as_true, default_connect_timeout_secs, default_timeout_secs};

pub const CHANNEL_ID_PLACEHOLDER: &str = "{channel_id}";

fn default_origin_url() -> String { String::from("https://therokuchannel.roku.com/") }
fn default_playback_url() -> String { String::from("https://therokuchannel.roku.com/api/v3/playback") }
fn default_token_header() -> String { String::from("csrf-token") }
fn default_play_id() -> String { String::from("live") }
fn default_media_format() -> String { String::from("m3u") }
fn default_drm_type() -> String { String::from("widevine") }
fn default_quality() -> String { String::from("fhd") }
fn default_provider_id() -> String { String::from("rokuavod") }
fn default_fallback_template() -> String {
    String::from("https://aka-live491.delivery.roku.com/{channel_id}/t2-origin/out/v1/live.m3u8")
}

fn default_origin_host() -> String { String::from("osm.sr.roku.com") }
fn default_origin_prefix() -> String { String::from("https://osm.sr.roku.com/") }
fn default_edge_prefix() -> String { String::from("https://aka-live491.delivery.roku.com/") }
fn default_origin_suffix() -> String { String::from("/live.m3u8") }
fn default_edge_suffix() -> String { String::from("/t2-origin/out/v1/live.m3u8") }

/// Origin-storage urls returned by the playback api are moved to the edge cdn.
/// Plain string substitution, only applied when the host matches exactly.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUrlRewrite {
    #[serde(default = "default_origin_host")]
    pub origin_host: String,
    #[serde(default = "default_origin_prefix")]
    pub origin_prefix: String,
    #[serde(default = "default_edge_prefix")]
    pub edge_prefix: String,
    #[serde(default = "default_origin_suffix")]
    pub origin_suffix: String,
    #[serde(default = "default_edge_suffix")]
    pub edge_suffix: String,
}

impl Default for ConfigUrlRewrite {
    fn default() -> Self {
        Self {
            origin_host: default_origin_host(),
            origin_prefix: default_origin_prefix(),
            edge_prefix: default_edge_prefix(),
            origin_suffix: default_origin_suffix(),
            edge_suffix: default_edge_suffix(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigProvider {
    /// When disabled every channel gets the fallback url without contacting the provider.
    #[serde(default = "default_as_true")]
    pub enabled: bool,
    #[serde(default = "default_origin_url")]
    pub origin_url: String,
    #[serde(default = "default_playback_url")]
    pub playback_url: String,
    #[serde(default = "default_token_header")]
    pub token_header: String,
    #[serde(default = "default_play_id")]
    pub play_id: String,
    #[serde(default = "default_media_format")]
    pub media_format: String,
    #[serde(default = "default_drm_type")]
    pub drm_type: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default = "default_provider_id")]
    pub provider_id: String,
    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,
    #[serde(default)]
    pub rewrite: ConfigUrlRewrite,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self {
            enabled: true,
            origin_url: default_origin_url(),
            playback_url: default_playback_url(),
            token_header: default_token_header(),
            play_id: default_play_id(),
            media_format: default_media_format(),
            drm_type: default_drm_type(),
            quality: default_quality(),
            provider_id: default_provider_id(),
            fallback_template: default_fallback_template(),
            rewrite: ConfigUrlRewrite::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConfigProvider {
    pub fn prepare(&mut self) -> Result<(), M3uGeneratorError> {
        for (field, value) in [("origin_url", &self.origin_url), ("playback_url", &self.playback_url),
                               ("rewrite.origin_prefix", &self.rewrite.origin_prefix), ("rewrite.edge_prefix", &self.rewrite.edge_prefix)] {
            if let Err(err) = Url::parse(value) {
                return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "provider {field} is not a valid url: {value} {err}");
            }
        }
        if !self.fallback_template.contains(CHANNEL_ID_PLACEHOLDER) {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info,
                "provider fallback_template must contain {CHANNEL_ID_PLACEHOLDER}: {}", self.fallback_template);
        }
        if self.token_header.trim().is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "provider token_header is empty");
        }
        self.token_header = self.token_header.trim().to_lowercase();
        Ok(())
    }
}
