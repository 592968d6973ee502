pub mod compression;
pub mod default_utils;
pub mod file;
pub mod network;
pub mod sys_utils;

#[macro_export]
macro_rules! debug_if_enabled {
    ($fmt:expr, $( $args:expr ),*) => {
        if log::log_enabled!(log::Level::Debug) {
            log::log!(log::Level::Debug, $fmt, $($args),*);
        }
    };

    ($txt:expr) => {
        if log::log_enabled!(log::Level::Debug) {
            log::log!(log::Level::Debug, $txt);
        }
    };
}

pub use debug_if_enabled;
