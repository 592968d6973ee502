use crate::model::channel::Channel;

// https://de.wikipedia.org/wiki/M3U
// https://siptv.eu/howto/playlist.html

pub const M3U_HEADER: &str = "#EXTM3U";
pub const EXTINF_PREFIX: &str = "#EXTINF:-1";

pub fn m3u_header(epg_url: &str) -> String {
    format!("{M3U_HEADER} url-tvg=\"{epg_url}\"\n")
}

#[inline]
fn sanitize_attribute(value: &str) -> String {
    value.replace('"', "'")
}

#[inline]
fn sanitize_title(value: &str) -> String {
    value.replace(',', "")
}

#[inline]
fn sanitize_chno(value: Option<&str>) -> &str {
    match value {
        Some(chno) if !chno.is_empty() && chno.chars().all(|c| c.is_ascii_digit()) => chno,
        _ => "",
    }
}

/// Metadata of one `#EXTINF` line. Values are kept raw, sanitizing happens in [`PlaylistItemHeader::to_m3u`].
#[derive(Debug, Clone, Default)]
pub struct PlaylistItemHeader {
    pub channel_id: String,
    pub tvg_id: String,
    pub chno: Option<String>,
    pub name: String,
    pub logo: String,
    pub group: String,
    pub title: String,
}

impl PlaylistItemHeader {
    pub fn from_channel(channel_id: &str, channel: &Channel) -> Self {
        let name = channel.get_name().to_string();
        Self {
            channel_id: channel_id.to_string(),
            tvg_id: channel_id.to_string(),
            chno: channel.get_chno(),
            title: name.clone(),
            name,
            logo: channel.get_logo(),
            group: channel.get_group(),
        }
    }

    /// Attribute order is fixed, players parse it positionally.
    pub fn to_m3u(&self) -> String {
        format!("{EXTINF_PREFIX} channel-id=\"{}\" tvg-id=\"{}\" tvg-chno=\"{}\" tvg-name=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}\n",
                self.channel_id,
                self.tvg_id,
                sanitize_chno(self.chno.as_deref()),
                sanitize_attribute(&self.name),
                self.logo,
                sanitize_attribute(&self.group),
                sanitize_title(&self.title))
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistItem {
    pub header: PlaylistItemHeader,
    pub url: String,
}

impl PlaylistItem {
    pub fn to_m3u(&self) -> String {
        format!("{}{}\n", self.header.to_m3u(), self.url)
    }
}
