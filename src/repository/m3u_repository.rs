use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::m3u_generator_error::{create_m3u_generator_error_result, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::model::config::Config;
use crate::utils::file::file_utils;

macro_rules! cant_write_result {
    ($path:expr, $err:expr) => {
        create_m3u_generator_error_result!(M3uGeneratorErrorKind::Persist, "failed to write m3u playlist: {} - {}", $path.to_string_lossy(), $err)
    }
}

pub fn get_m3u_file_path(cfg: &Config, filename: &str) -> Option<PathBuf> {
    file_utils::get_file_path(&cfg.working_dir, Some(PathBuf::from(filename)))
}

/// Replaces the file content with `content`.
pub fn write_m3u_playlist(m3u_path: &Path, content: &str) -> Result<(), M3uGeneratorError> {
    if let Some(parent) = m3u_path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                return cant_write_result!(m3u_path, err);
            }
        }
    }
    match file_utils::create_new_file_for_write(m3u_path) {
        Ok(file) => {
            let mut writer = file_utils::file_writer(file);
            if let Err(err) = writer.write_all(content.as_bytes()) {
                return cant_write_result!(m3u_path, err);
            }
            if let Err(err) = writer.flush() {
                return cant_write_result!(m3u_path, err);
            }
            info!("Successfully wrote {}", m3u_path.to_string_lossy());
            Ok(())
        }
        Err(err) => cant_write_result!(m3u_path, err),
    }
}
