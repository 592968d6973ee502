use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};

pub const UNKNOWN_CHANNEL_NAME: &str = "Unknown Channel";
pub const UNCATEGORIZED_GROUP: &str = "Uncategorized";

/// One entry of the remote catalog. Fields stay untyped because catalogs
/// mix numbers, strings and nulls, the accessors read them leniently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chno: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Value>,
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Strings as they are, numbers in their json form, everything else is `None`.
fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl Channel {
    pub fn get_name(&self) -> &str {
        self.name.as_ref().and_then(Value::as_str).unwrap_or(UNKNOWN_CHANNEL_NAME)
    }

    pub fn get_logo(&self) -> String {
        self.logo.as_ref().and_then(value_as_text).unwrap_or_default()
    }

    /// First group of the list. A first entry that is no text renders empty,
    /// a missing or empty list is uncategorized.
    pub fn get_group(&self) -> String {
        match self.groups.as_ref().and_then(Value::as_array).and_then(|groups| groups.first()) {
            Some(group) => value_as_text(group).unwrap_or_default(),
            None => UNCATEGORIZED_GROUP.to_string(),
        }
    }

    /// String form of the channel number as found in the catalog, not validated.
    pub fn get_chno(&self) -> Option<String> {
        match &self.chno {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(value) => Some(value.to_string()),
        }
    }

    /// `None` when the channel has no usable number, an error when the value
    /// has a shape no channel number can have.
    pub fn get_chno_sort_key(&self) -> Result<Option<u64>, M3uGeneratorError> {
        match &self.chno {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => match number.as_u64() {
                Some(chno) => Ok(Some(chno)),
                None => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "channel number {number} is not a non-negative integer"),
            },
            Some(Value::String(value)) => {
                if is_digits(value) {
                    match value.parse::<u64>() {
                        Ok(chno) => Ok(Some(chno)),
                        Err(err) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "channel number {value} out of range {err}"),
                    }
                } else {
                    Ok(None)
                }
            }
            Some(value) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "unsupported channel number {value}"),
        }
    }

    pub fn get_name_sort_key(&self) -> String {
        self.name.as_ref().and_then(Value::as_str).unwrap_or_default().to_lowercase()
    }
}

/// The `channels` mapping of the catalog document, in document order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub channels: IndexMap<String, Channel>,
}

impl Catalog {
    /// Fails only when the document has no `channels` object. Entries that
    /// are not objects are skipped.
    pub fn from_value(value: Value) -> Result<Self, M3uGeneratorError> {
        let entries = match value {
            Value::Object(mut document) => match document.remove("channels") {
                Some(Value::Object(entries)) => entries,
                _ => return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "catalog has no channels"),
            },
            _ => return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "catalog has no channels"),
        };
        let mut channels = IndexMap::with_capacity(entries.len());
        for (channel_id, entry) in entries {
            if !entry.is_object() {
                warn!("Skipping channel {channel_id}, entry is not an object: {entry}");
                continue;
            }
            match serde_json::from_value::<Channel>(entry) {
                Ok(channel) => {
                    channels.insert(channel_id, channel);
                }
                Err(err) => warn!("Skipping channel {channel_id}: {err}"),
            }
        }
        Ok(Self { channels })
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::{Catalog, Channel, UNCATEGORIZED_GROUP, UNKNOWN_CHANNEL_NAME};

    fn channel(value: serde_json::Value) -> Channel {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let chan = channel(json!({}));
        assert_eq!(chan.get_name(), UNKNOWN_CHANNEL_NAME);
        assert_eq!(chan.get_logo(), "");
        assert_eq!(chan.get_group(), UNCATEGORIZED_GROUP);
        assert_eq!(chan.get_chno(), None);

        let chan = channel(json!({"groups": [], "name": null, "chno": null}));
        assert_eq!(chan.get_group(), UNCATEGORIZED_GROUP);
        assert_eq!(chan.get_name(), UNKNOWN_CHANNEL_NAME);
    }

    #[test]
    fn test_first_group_wins() {
        let chan = channel(json!({"groups": ["News", "Sports"]}));
        assert_eq!(chan.get_group(), "News");
    }

    #[test]
    fn test_chno_sort_key() {
        assert_eq!(channel(json!({"chno": 12})).get_chno_sort_key().unwrap(), Some(12));
        assert_eq!(channel(json!({"chno": "7"})).get_chno_sort_key().unwrap(), Some(7));
        assert_eq!(channel(json!({"chno": ""})).get_chno_sort_key().unwrap(), None);
        assert_eq!(channel(json!({"chno": "12a"})).get_chno_sort_key().unwrap(), None);
        assert_eq!(channel(json!({})).get_chno_sort_key().unwrap(), None);
        assert!(channel(json!({"chno": -3})).get_chno_sort_key().is_err());
        assert!(channel(json!({"chno": [1]})).get_chno_sort_key().is_err());
        assert!(channel(json!({"chno": true})).get_chno_sort_key().is_err());
        assert!(channel(json!({"chno": "99999999999999999999999"})).get_chno_sort_key().is_err());
    }

    #[test]
    fn test_catalog_keeps_document_order() {
        let catalog = Catalog::from_value(json!({"channels": {"z": {}, "a": {}, "m": {}}})).unwrap();
        let ids = catalog.channels.keys().map(String::as_str).collect::<Vec<&str>>();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_catalog_without_channels() {
        assert!(Catalog::from_value(json!({"stations": {}})).is_err());
        assert!(Catalog::from_value(json!([])).is_err());
        assert!(Catalog::from_value(json!({"channels": []})).is_err());
    }

    #[test]
    fn test_odd_entries_do_not_spoil_catalog() {
        let catalog = Catalog::from_value(json!({"channels": {
            "good": {"chno": 1, "name": "Good", "logo": "https://img.example.com/good.png", "groups": ["News"]},
            "null_group": {"name": "Odd", "groups": [null, "News"]},
            "number_logo": {"name": 42, "logo": 5, "groups": "News"},
            "broken": "not a channel",
            "also_good": {"name": "Also Good"},
        }})).unwrap();
        let ids = catalog.channels.keys().map(String::as_str).collect::<Vec<&str>>();
        assert_eq!(ids, vec!["good", "null_group", "number_logo", "also_good"]);

        let good = &catalog.channels["good"];
        assert_eq!(good.get_group(), "News");
        assert_eq!(good.get_logo(), "https://img.example.com/good.png");

        let null_group = &catalog.channels["null_group"];
        assert_eq!(null_group.get_group(), "");

        let number_logo = &catalog.channels["number_logo"];
        assert_eq!(number_logo.get_logo(), "5");
        assert_eq!(number_logo.get_name(), UNKNOWN_CHANNEL_NAME);
        assert_eq!(number_logo.get_group(), UNCATEGORIZED_GROUP);
        assert_eq!(number_logo.get_name_sort_key(), "");
    }
}
