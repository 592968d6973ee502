use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Error, ErrorKind, Write};
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::m3u_generator_error::{create_m3u_generator_error_result, to_m3u_generator_error, M3uGeneratorError, M3uGeneratorErrorKind};
use crate::utils::compression::compression_utils::{decode_content, is_gzip, ENCODING_GZIP};

pub const CONFIG_FILE: &str = "config.yml";

pub fn file_writer<W>(w: W) -> BufWriter<W>
where
    W: Write,
{
    BufWriter::with_capacity(131_072, w)
}

pub fn get_exe_path() -> PathBuf {
    std::env::current_exe().ok()
        .map(|exe| fs::read_link(&exe).unwrap_or(exe))
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("./"))
}

/// `config.yml` next to the executable wins over the one in the current directory.
pub fn get_default_config_path() -> PathBuf {
    let exe_config = get_exe_path().join(CONFIG_FILE);
    if exe_config.exists() {
        exe_config
    } else {
        PathBuf::from(CONFIG_FILE)
    }
}

/// Absolute working directory. Empty means the current directory, anything
/// else is created when missing.
pub fn get_working_path(wd: &str) -> Result<String, M3uGeneratorError> {
    let current_dir = std::env::current_dir()
        .map_err(|err| to_m3u_generator_error!(M3uGeneratorErrorKind::Info, err))?;
    if wd.is_empty() {
        return Ok(current_dir.to_string_lossy().to_string());
    }
    let work_path = current_dir.join(wd);
    if let Err(err) = fs::create_dir_all(&work_path) {
        return create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "cant create working dir {}: {err}", work_path.to_string_lossy());
    }
    match work_path.canonicalize() {
        Ok(path) if path.is_dir() => Ok(path.to_string_lossy().to_string()),
        Ok(path) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "working dir {} is not a directory", path.to_string_lossy()),
        Err(err) => create_m3u_generator_error_result!(M3uGeneratorErrorKind::Info, "working dir not found {}: {err}", work_path.to_string_lossy()),
    }
}

pub fn get_file_path(wd: &str, path: Option<PathBuf>) -> Option<PathBuf> {
    path.map(|p| if p.is_relative() {
        let pb = PathBuf::from(wd);
        pb.join(&p).clean()
    } else {
        p
    })
}

#[inline]
pub fn open_file(file_name: &Path) -> Result<File, std::io::Error> {
    File::open(file_name)
}

#[inline]
pub fn create_new_file_for_write(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

pub fn get_local_file_content(file_path: &Path) -> Result<String, Error> {
    if file_path.exists() && file_path.is_file() {
        let content = fs::read(file_path)?;
        let encoding = if is_gzip(&content) { Some(ENCODING_GZIP) } else { None };
        return decode_content(encoding, &content);
    }
    let file_str = file_path.to_str().unwrap_or("?");
    Err(Error::new(ErrorKind::NotFound, format!("Cant find file {file_str}")))
}
