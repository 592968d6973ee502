use std::error::Error;
use std::fmt::{Display, Formatter, Result};

#[macro_export]
macro_rules! create_m3u_generator_error_result {
     ($kind: expr, $($arg:tt)*) => {
        Err($crate::m3u_generator_error::M3uGeneratorError::new($kind, format!($($arg)*)))
    }
}

#[macro_export]
macro_rules! to_m3u_generator_error {
     ($kind: expr, $err:expr) => {
        $crate::m3u_generator_error::M3uGeneratorError::new($kind, $err.to_string())
    }
}

pub use create_m3u_generator_error_result;
pub use to_m3u_generator_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum M3uGeneratorErrorKind {
    Info,
    Catalog,
    Resolve,
    Persist,
}

#[derive(Debug)]
pub struct M3uGeneratorError {
    pub kind: M3uGeneratorErrorKind,
    pub message: String,
}

impl M3uGeneratorError {
    pub const fn new(kind: M3uGeneratorErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
        }
    }
}

impl Display for M3uGeneratorError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "M3uGenerator error: {}", self.message)
    }
}

impl Error for M3uGeneratorError {}

pub fn str_to_io_error(err: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err)
}
