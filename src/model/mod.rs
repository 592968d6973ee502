pub mod channel;
pub mod config;
pub mod config_log;
pub mod config_provider;
pub mod config_sort;
pub mod config_source;
pub mod playlist;
pub mod stats;
