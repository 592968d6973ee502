use std::time::Instant;

use log::{error, info};

use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::model::channel::Catalog;
use crate::model::config::Config;
use crate::model::config_sort::SortMode;
use crate::model::config_source::ConfigSource;
use crate::model::playlist::{m3u_header, PlaylistItem, PlaylistItemHeader};
use crate::model::stats::SourceStats;
use crate::processing::catalog_source::{CatalogSource, HttpCatalogSource};
use crate::processing::processor::sort::sort_channel_ids;
use crate::processing::stream_resolver::{FallbackStreamResolver, ProviderStreamResolver, StreamResolver};
use crate::repository::m3u_repository;
use crate::utils::debug_if_enabled;
use crate::utils::network::request::create_client;

pub struct PlaylistDocument {
    pub content: String,
    pub channels: usize,
    pub fallbacks: usize,
}

/// Renders the whole playlist document, header first, then one `#EXTINF`
/// line and one url line per channel.
pub fn build_playlist(source_name: &str, catalog: &Catalog, sort: SortMode, epg_url: &str, resolver: &dyn StreamResolver) -> PlaylistDocument {
    let mut document = PlaylistDocument { content: m3u_header(epg_url), channels: 0, fallbacks: 0 };
    for channel_id in sort_channel_ids(source_name, catalog, sort) {
        if let Some(channel) = catalog.channels.get(channel_id) {
            let stream = resolver.resolve_stream(channel_id);
            if stream.fallback {
                document.fallbacks += 1;
            }
            let item = PlaylistItem {
                header: PlaylistItemHeader::from_channel(channel_id, channel),
                url: stream.url,
            };
            debug_if_enabled!("Channel {} => {}", channel_id, item.url);
            document.content.push_str(&item.to_m3u());
            document.channels += 1;
        }
    }
    document
}

fn fetch_catalog(source: &ConfigSource, catalog_source: &dyn CatalogSource) -> Result<Catalog, M3uGeneratorError> {
    match catalog_source.fetch(&source.url, source.gzip) {
        Some(value) => Catalog::from_value(value),
        None => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "Failed to fetch or parse {} data.", source.name),
    }
}

pub fn process_source(cfg: &Config, source: &ConfigSource, catalog_source: &dyn CatalogSource, resolver: &dyn StreamResolver) -> Result<PlaylistDocument, M3uGeneratorError> {
    info!("--- Generating {} playlist ---", source.name);
    let catalog = fetch_catalog(source, catalog_source)?;
    if catalog.is_empty() {
        info!("Source is empty {}", source.name);
    } else {
        info!("Source {} has {} channels, sorting by {}", source.name, catalog.len(), source.sort);
    }

    let document = build_playlist(&source.name, &catalog, source.sort, &source.epg_url, resolver);

    match m3u_repository::get_m3u_file_path(cfg, &source.filename) {
        Some(m3u_path) => {
            m3u_repository::write_m3u_playlist(&m3u_path, &document.content)?;
            info!("Source {}: {} channels, {} fallback urls, written to {}",
                source.name, document.channels, document.fallbacks, m3u_path.to_string_lossy());
        }
        None => return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Persist, "No output path for {}", source.filename),
    }
    Ok(document)
}

/// Sources are processed one after another, a failing source does not stop the others.
pub fn process_sources(cfg: &Config, catalog_source: &dyn CatalogSource, resolver: &dyn StreamResolver) -> Vec<SourceStats> {
    let mut stats = Vec::with_capacity(cfg.sources.len());
    for source in &cfg.sources {
        let start_time = Instant::now();
        let result = process_source(cfg, source, catalog_source, resolver);
        let elapsed = start_time.elapsed().as_secs();
        match result {
            Ok(document) => stats.push(SourceStats::success(&source.name, document.channels, document.fallbacks, elapsed)),
            Err(err) => {
                error!("{}", err.message);
                stats.push(SourceStats::failure(&source.name, elapsed));
            }
        }
    }
    stats
}

pub fn exec_processing(cfg: &Config) {
    let start_time = Instant::now();
    let client = match create_client(cfg.provider.connect_timeout_secs, cfg.provider.timeout_secs, false) {
        Ok(client) => client,
        Err(err) => {
            error!("{}", err.message);
            return;
        }
    };
    let catalog_source = HttpCatalogSource::new(client, cfg.working_dir.clone());
    let resolver: Box<dyn StreamResolver> = if cfg.provider.enabled {
        Box::new(ProviderStreamResolver::new(cfg.provider.clone()))
    } else {
        info!("Stream resolving disabled, using fallback urls");
        Box::new(FallbackStreamResolver::new(&cfg.provider.fallback_template))
    };

    let stats = process_sources(cfg, &catalog_source, resolver.as_ref());
    if let Ok(stats_msg) = serde_json::to_string(&serde_json::json!({ "stats": stats })) {
        info!("{stats_msg}");
    }
    let elapsed = start_time.elapsed().as_secs();
    info!("Update process finished! Took {elapsed} secs.");
}
