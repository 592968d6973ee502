use std::cmp::Ordering;

use log::warn;

use crate::m3u_generator_error::M3uGeneratorError;
use crate::model::channel::Catalog;
use crate::model::config_sort::SortMode;

/// Channels without a usable number go last.
fn chno_comparator(chno_a: Option<u64>, chno_b: Option<u64>) -> Ordering {
    match (chno_a, chno_b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_by_chno(catalog: &Catalog) -> Result<Vec<&str>, M3uGeneratorError> {
    let mut keys = catalog.channels.iter()
        .map(|(id, channel)| channel.get_chno_sort_key().map(|chno| (chno, id.as_str())))
        .collect::<Result<Vec<(Option<u64>, &str)>, M3uGeneratorError>>()?;
    keys.sort_by(|(chno_a, _), (chno_b, _)| chno_comparator(*chno_a, *chno_b));
    Ok(keys.into_iter().map(|(_, id)| id).collect())
}

fn sort_by_name(catalog: &Catalog) -> Vec<&str> {
    let mut keys = catalog.channels.iter()
        .map(|(id, channel)| (channel.get_name_sort_key(), id.as_str()))
        .collect::<Vec<(String, &str)>>();
    keys.sort_by(|(name_a, _), (name_b, _)| name_a.cmp(name_b));
    keys.into_iter().map(|(_, id)| id).collect()
}

/// Channel ids in playlist order. Sorting is stable, equal keys keep catalog order.
/// When a sort key cannot be extracted the catalog order is returned unchanged.
pub fn sort_channel_ids<'a>(source_name: &str, catalog: &'a Catalog, sort: SortMode) -> Vec<&'a str> {
    let sorted = match sort {
        SortMode::ChannelNumber => sort_by_chno(catalog),
        SortMode::Name => Ok(sort_by_name(catalog)),
    };
    sorted.unwrap_or_else(|err| {
        warn!("Sorting failed for {source_name}, using default order. Error: {}", err.message);
        catalog.channels.keys().map(String::as_str).collect()
    })
}
