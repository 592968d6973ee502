use log::error;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::utils::network::request;

/// Fetches the raw catalog document. Any failure is reported as `None`,
/// the cause is logged where it happens.
pub trait CatalogSource {
    fn fetch(&self, url: &str, gzip: bool) -> Option<Value>;
}

pub struct HttpCatalogSource {
    client: Client,
    working_dir: String,
}

impl HttpCatalogSource {
    pub const fn new(client: Client, working_dir: String) -> Self {
        Self { client, working_dir }
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch(&self, url: &str, gzip: bool) -> Option<Value> {
        match request::get_input_json_content(&self.client, &self.working_dir, url, gzip) {
            Ok(value) => Some(value),
            Err(err) => {
                error!("Failed to fetch {url}: {}", err.message);
                None
            }
        }
    }
}
