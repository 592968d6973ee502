use log::{debug, error};
use reqwest::blocking::Client;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::m3u_generator_error::{create_m3u_generator_error_result, to_m3u_generator_error, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::model::config_provider::{ConfigProvider, ConfigUrlRewrite, CHANNEL_ID_PLACEHOLDER};
use crate::utils::debug_if_enabled;
use crate::utils::network::request::create_client;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    pub url: String,
    /// Set when the url was synthesized from the fallback template.
    pub fallback: bool,
}

impl ResolvedStream {
    pub const fn negotiated(url: String) -> Self {
        Self { url, fallback: false }
    }

    pub const fn fallback(url: String) -> Self {
        Self { url, fallback: true }
    }
}

/// Resolves a channel id to a playable stream url. Implementations never fail,
/// they fall back to a synthesized url instead.
pub trait StreamResolver {
    fn resolve_stream(&self, channel_id: &str) -> ResolvedStream;

    fn resolve(&self, channel_id: &str) -> String {
        self.resolve_stream(channel_id).url
    }
}

pub fn fallback_stream_url(template: &str, channel_id: &str) -> String {
    template.replace(CHANNEL_ID_PLACEHOLDER, channel_id)
}

/// Moves origin-storage urls to the edge cdn. Urls on any other host are returned unchanged.
/// Scheme, host and port all come from the edge prefix, only path, query and
/// fragment are carried over.
pub fn rewrite_stream_url(stream_url: &str, rewrite: &ConfigUrlRewrite) -> String {
    let url = match Url::parse(stream_url) {
        Ok(url) if url.host_str() == Some(rewrite.origin_host.as_str()) => url,
        _ => return stream_url.to_string(),
    };
    let origin_path = Url::parse(&rewrite.origin_prefix)
        .map_or_else(|_| String::from("/"), |origin| origin.path().to_string());
    match url.path().strip_prefix(origin_path.as_str()) {
        Some(path) => format!("{}{}{}",
                              rewrite.edge_prefix,
                              path.replace(&rewrite.origin_suffix, &rewrite.edge_suffix),
                              &url[Position::AfterPath..]),
        None => stream_url.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaybackRequest<'a> {
    roku_id: &'a str,
    play_id: &'a str,
    media_format: &'a str,
    drm_type: &'a str,
    quality: &'a str,
    bif_url: Option<&'a str>,
    ad_policy_id: &'a str,
    provider_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PlaybackResponse {
    #[serde(default)]
    url: Option<String>,
}

/// Negotiates playback with the provider. Every resolution opens its own
/// cookie session, nothing is shared between channels.
pub struct ProviderStreamResolver {
    provider: ConfigProvider,
}

impl ProviderStreamResolver {
    pub const fn new(provider: ConfigProvider) -> Self {
        Self { provider }
    }

    fn fetch_token(&self, client: &Client) -> Result<Option<HeaderValue>, M3uGeneratorError> {
        let response = client.get(&self.provider.origin_url).send()
            .map_err(|err| to_m3u_generator_error!(M3uGeneratorErrorKind::Resolve, err))?;
        let token = response.headers().get(self.provider.token_header.as_str()).cloned();
        if token.is_none() {
            debug!("No {} header from {}, continuing without token", self.provider.token_header, self.provider.origin_url);
        }
        Ok(token)
    }

    fn negotiate(&self, channel_id: &str) -> Result<String, M3uGeneratorError> {
        let client = create_client(self.provider.connect_timeout_secs, self.provider.timeout_secs, true)?;
        let token = self.fetch_token(&client)?;

        let body = PlaybackRequest {
            roku_id: channel_id,
            play_id: &self.provider.play_id,
            media_format: &self.provider.media_format,
            drm_type: &self.provider.drm_type,
            quality: &self.provider.quality,
            bif_url: None,
            ad_policy_id: "",
            provider_id: &self.provider.provider_id,
        };
        let mut request = client.post(&self.provider.playback_url).json(&body);
        if let Some(token_value) = token {
            let header_name = HeaderName::from_bytes(self.provider.token_header.as_bytes())
                .map_err(|err| to_m3u_generator_error!(M3uGeneratorErrorKind::Resolve, err))?;
            request = request.header(header_name, token_value);
        }

        let response = request.send()
            .map_err(|err| to_m3u_generator_error!(M3uGeneratorErrorKind::Resolve, err))?;
        let status = response.status();
        if status != StatusCode::OK {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Resolve, "playback request failed with status {status}");
        }
        let playback = response.json::<PlaybackResponse>()
            .map_err(|err| to_m3u_generator_error!(M3uGeneratorErrorKind::Resolve, err))?;
        let stream_url = playback.url.unwrap_or_default();
        if stream_url.is_empty() {
            return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Resolve, "playback response contains no url");
        }
        Ok(rewrite_stream_url(&stream_url, &self.provider.rewrite))
    }
}

impl StreamResolver for ProviderStreamResolver {
    fn resolve_stream(&self, channel_id: &str) -> ResolvedStream {
        match self.negotiate(channel_id) {
            Ok(stream_url) => {
                debug_if_enabled!("Resolved channel {} to {}", channel_id, stream_url);
                ResolvedStream::negotiated(stream_url)
            }
            Err(err) => {
                error!("Failed to get stream URL for channel {channel_id}: {}", err.message);
                ResolvedStream::fallback(fallback_stream_url(&self.provider.fallback_template, channel_id))
            }
        }
    }
}

/// Skips negotiation, every channel gets the fallback url.
pub struct FallbackStreamResolver {
    template: String,
}

impl FallbackStreamResolver {
    pub fn new(template: &str) -> Self {
        Self { template: template.to_string() }
    }
}

impl StreamResolver for FallbackStreamResolver {
    fn resolve_stream(&self, channel_id: &str) -> ResolvedStream {
        ResolvedStream::fallback(fallback_stream_url(&self.template, channel_id))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;
    use crate::model::config_provider::{ConfigProvider, ConfigUrlRewrite};
    use super::{fallback_stream_url, rewrite_stream_url, FallbackStreamResolver, ProviderStreamResolver, StreamResolver};

    const FALLBACK: &str = "https://aka-live491.delivery.roku.com/abc123/t2-origin/out/v1/live.m3u8";

    fn provider(server: &mockito::Server) -> ConfigProvider {
        let mut provider = ConfigProvider {
            origin_url: format!("{}/", server.url()),
            playback_url: format!("{}/api/v3/playback", server.url()),
            connect_timeout_secs: 2,
            timeout_secs: 5,
            ..ConfigProvider::default()
        };
        provider.prepare().unwrap();
        provider
    }

    #[test]
    fn test_rewrite_on_origin_host() {
        let rewritten = rewrite_stream_url("https://osm.sr.roku.com/abc123/live.m3u8?token=1", &ConfigUrlRewrite::default());
        assert_eq!(rewritten, "https://aka-live491.delivery.roku.com/abc123/t2-origin/out/v1/live.m3u8?token=1");
    }

    #[test]
    fn test_rewrite_normalizes_origin_forms() {
        let rewrite = ConfigUrlRewrite::default();
        for url in [
            "http://osm.sr.roku.com/abc/live.m3u8",
            "https://OSM.SR.ROKU.COM/abc/live.m3u8",
            "https://osm.sr.roku.com:443/abc/live.m3u8",
            "http://osm.sr.roku.com:8080/abc/live.m3u8",
        ] {
            assert_eq!(rewrite_stream_url(url, &rewrite), "https://aka-live491.delivery.roku.com/abc/t2-origin/out/v1/live.m3u8", "{url}");
        }
    }

    #[test]
    fn test_rewrite_keeps_query_and_fragment() {
        let rewritten = rewrite_stream_url("https://osm.sr.roku.com/abc/live.m3u8?a=1&b=2#start", &ConfigUrlRewrite::default());
        assert_eq!(rewritten, "https://aka-live491.delivery.roku.com/abc/t2-origin/out/v1/live.m3u8?a=1&b=2#start");
    }

    #[test]
    fn test_no_rewrite_on_other_hosts() {
        let rewrite = ConfigUrlRewrite::default();
        for url in [
            "https://cdn.example.com/abc123/live.m3u8",
            "https://osm.sr.roku.com.evil.example/abc123/live.m3u8",
            "https://sub.osm.sr.roku.com/abc123/live.m3u8",
            "https://cdn.example.com/https://osm.sr.roku.com/live.m3u8",
            "not a url osm.sr.roku.com/live.m3u8",
        ] {
            assert_eq!(rewrite_stream_url(url, &rewrite), url);
        }
    }

    #[test]
    fn test_fallback_template() {
        assert_eq!(fallback_stream_url(&ConfigProvider::default().fallback_template, "abc123"), FALLBACK);
        assert_eq!(FallbackStreamResolver::new("https://edge.example.com/{channel_id}.m3u8").resolve("x"), "https://edge.example.com/x.m3u8");
    }

    #[test]
    fn test_resolve_with_token_and_session() {
        let mut server = mockito::Server::new();
        let root = server.mock("GET", "/")
            .with_status(200)
            .with_header("csrf-token", "tok-42")
            .with_header("set-cookie", "session=s1; Path=/")
            .create();
        let playback = server.mock("POST", "/api/v3/playback")
            .match_header("csrf-token", "tok-42")
            .match_header("content-type", "application/json")
            .match_header("cookie", Matcher::Regex("session=s1".to_string()))
            .match_body(Matcher::Json(json!({
                "rokuId": "abc123",
                "playId": "live",
                "mediaFormat": "m3u",
                "drmType": "widevine",
                "quality": "fhd",
                "bifUrl": null,
                "adPolicyId": "",
                "providerId": "rokuavod",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"url":"https://osm.sr.roku.com/abc123/live.m3u8?sig=1"}"#)
            .create();

        let resolver = ProviderStreamResolver::new(provider(&server));
        let stream = resolver.resolve_stream("abc123");
        assert_eq!(stream.url, "https://aka-live491.delivery.roku.com/abc123/t2-origin/out/v1/live.m3u8?sig=1");
        assert!(!stream.fallback);
        root.assert();
        playback.assert();
    }

    #[test]
    fn test_resolve_without_token() {
        let mut server = mockito::Server::new();
        let _root = server.mock("GET", "/").with_status(200).create();
        let playback = server.mock("POST", "/api/v3/playback")
            .match_header("csrf-token", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"url":"https://cdn.example.com/abc123/master.m3u8"}"#)
            .create();

        let resolver = ProviderStreamResolver::new(provider(&server));
        assert_eq!(resolver.resolve("abc123"), "https://cdn.example.com/abc123/master.m3u8");
        playback.assert();
    }

    #[test]
    fn test_resolve_falls_back_on_error_status() {
        let mut server = mockito::Server::new();
        let _root = server.mock("GET", "/").with_status(200).create();
        let _playback = server.mock("POST", "/api/v3/playback")
            .with_status(403)
            .with_body(r#"{"url":"https://cdn.example.com/abc123/master.m3u8"}"#)
            .create();

        let resolver = ProviderStreamResolver::new(provider(&server));
        let stream = resolver.resolve_stream("abc123");
        assert_eq!(stream.url, FALLBACK);
        assert!(stream.fallback);
    }

    #[test]
    fn test_resolve_falls_back_on_non_ok_success_status() {
        let mut server = mockito::Server::new();
        let _root = server.mock("GET", "/").with_status(200).create();
        let _playback = server.mock("POST", "/api/v3/playback")
            .with_status(201)
            .with_body(r#"{"url":"https://cdn.example.com/abc123/master.m3u8"}"#)
            .create();

        let resolver = ProviderStreamResolver::new(provider(&server));
        assert_eq!(resolver.resolve("abc123"), FALLBACK);
    }

    #[test]
    fn test_resolve_falls_back_on_malformed_response() {
        let mut server = mockito::Server::new();
        let _root = server.mock("GET", "/").with_status(200).create();
        let _playback = server.mock("POST", "/api/v3/playback")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();

        let resolver = ProviderStreamResolver::new(provider(&server));
        assert_eq!(resolver.resolve("abc123"), FALLBACK);
    }

    #[test]
    fn test_resolve_falls_back_on_missing_url() {
        let mut server = mockito::Server::new();
        let _root = server.mock("GET", "/").with_status(200).create();
        let _playback = server.mock("POST", "/api/v3/playback")
            .with_status(200)
            .with_body(r#"{"drm":{}}"#)
            .create();

        let resolver = ProviderStreamResolver::new(provider(&server));
        assert_eq!(resolver.resolve("abc123"), FALLBACK);
    }

    #[test]
    fn test_resolve_falls_back_on_network_error() {
        let mut provider = ConfigProvider {
            origin_url: "http://127.0.0.1:1/".to_string(),
            playback_url: "http://127.0.0.1:1/api/v3/playback".to_string(),
            connect_timeout_secs: 2,
            timeout_secs: 2,
            ..ConfigProvider::default()
        };
        provider.prepare().unwrap();
        let resolver = ProviderStreamResolver::new(provider);
        for channel_id in ["abc123", "", "with space"] {
            let url = resolver.resolve(channel_id);
            assert!(!url.is_empty());
            assert_eq!(url, fallback_stream_url(&ConfigProvider::default().fallback_template, channel_id));
        }
    }
}
