use std::path::PathBuf;
use std::time::Duration;

use log::error;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, ACCEPT_ENCODING, CONTENT_ENCODING};
use serde_json::Value;
use url::Url;

use crate::m3u_generator_error::{create_m3u_generator_error_result, str_to_io_error, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::utils::compression::compression_utils::{decode_content, detect_encoding, ENCODING_GZIP};
use crate::utils::debug_if_enabled;
use crate::utils::file::file_utils::{get_file_path, get_local_file_content};

pub fn create_client(connect_timeout_secs: u64, timeout_secs: u64, cookie_store: bool) -> Result<Client, M3uGeneratorError> {
    let mut builder = Client::builder()
        .cookie_store(cookie_store);
    if connect_timeout_secs > 0 {
        builder = builder.connect_timeout(Duration::from_secs(connect_timeout_secs));
    }
    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    match builder.build() {
        Ok(client) => Ok(client),
        Err(err) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "cant create http client: {err}"),
    }
}

pub fn download_text_content(client: &Client, url: &Url, gzip: bool) -> Result<String, std::io::Error> {
    let mut request = client.get(url.clone());
    if gzip {
        request = request.header(ACCEPT_ENCODING, HeaderValue::from_static(ENCODING_GZIP));
    }
    match request.send() {
        Ok(response) => {
            if response.status().is_success() {
                let header_value = response.headers().get(CONTENT_ENCODING)
                    .and_then(|encoding_header| encoding_header.to_str().ok())
                    .map(ToString::to_string);
                match response.bytes() {
                    Ok(bytes) => {
                        let encoding = detect_encoding(header_value.as_deref(), &bytes);
                        decode_content(encoding.as_deref(), &bytes)
                    }
                    Err(err) => Err(str_to_io_error(&format!("failed to read response body {err}"))),
                }
            } else {
                Err(str_to_io_error(&format!("Request failed with status {} {}", response.status(), url.as_str())))
            }
        }
        Err(err) => Err(str_to_io_error(&format!("Request failed: {} {err}", url.as_str()))),
    }
}

/// Downloads `url_str`, or reads it from disk when it is not a url. Relative
/// paths are resolved against `working_dir`.
pub fn get_input_text_content(client: &Client, working_dir: &str, url_str: &str, gzip: bool) -> Result<String, M3uGeneratorError> {
    debug_if_enabled!("getting input text content working_dir: {}, url: {}", working_dir, url_str);

    if let Ok(url) = url_str.parse::<Url>() {
        match download_text_content(client, &url, gzip) {
            Ok(content) => Ok(content),
            Err(e) => {
                error!("cant download input url: {url_str}  => {e}");
                create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "Failed to download {url_str}: {e}")
            }
        }
    } else {
        match get_file_path(working_dir, Some(PathBuf::from(url_str))) {
            Some(filepath) => match get_local_file_content(&filepath) {
                Ok(content) => Ok(content),
                Err(err) => {
                    let file_str = filepath.to_str().unwrap_or("?");
                    error!("cant read file: {file_str} {err}");
                    create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "Cant open file : {file_str}  => {err}")
                }
            },
            None => {
                let msg = format!("cant read input url: {url_str:?}");
                error!("{msg}");
                create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "{msg}")
            }
        }
    }
}

pub fn get_input_json_content(client: &Client, working_dir: &str, url_str: &str, gzip: bool) -> Result<Value, M3uGeneratorError> {
    let content = get_input_text_content(client, working_dir, url_str, gzip)?;
    match serde_json::from_str::<Value>(&content) {
        Ok(value) => Ok(value),
        Err(err) => {
            error!("cant parse json from {url_str}  => {err}");
            create_m3u_generator_error_result!(M3uGeneratorErrorKind::Catalog, "Failed to parse json {url_str}: {err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use crate::m3u_generator_error::M3uGeneratorErrorKind;
    use super::{create_client, get_input_json_content, get_input_text_content};

    #[test]
    fn test_download_gzip_json() {
        let mut server = mockito::Server::new();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"channels":{"a":{"name":"A"}}}"#).unwrap();
        let body = encoder.finish().unwrap();
        let mock = server.mock("GET", "/.channels.json")
            .match_header("accept-encoding", "gzip")
            .with_status(200)
            .with_header("content-encoding", "gzip")
            .with_body(body)
            .create();

        let client = create_client(5, 5, false).unwrap();
        let url = format!("{}/.channels.json", server.url());
        let value = get_input_json_content(&client, ".", &url, true).unwrap();
        assert_eq!(value["channels"]["a"]["name"], "A");
        mock.assert();
    }

    #[test]
    fn test_download_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing").with_status(404).create();
        let client = create_client(5, 5, false).unwrap();
        let url = format!("{}/missing", server.url());
        let err = get_input_text_content(&client, ".", &url, false).unwrap_err();
        assert_eq!(err.kind, M3uGeneratorErrorKind::Catalog);
    }

    #[test]
    fn test_malformed_json() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/broken").with_status(200).with_body("{not json").create();
        let client = create_client(5, 5, false).unwrap();
        let url = format!("{}/broken", server.url());
        assert!(get_input_json_content(&client, ".", &url, false).is_err());
    }

    #[test]
    fn test_local_file_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("channels.json"), r#"{"channels":{}}"#).unwrap();
        let client = create_client(5, 5, false).unwrap();
        let working_dir = dir.path().to_str().unwrap();
        let value = get_input_json_content(&client, working_dir, "channels.json", true).unwrap();
        assert!(value["channels"].is_object());
    }
}
