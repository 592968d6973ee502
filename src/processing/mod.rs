pub mod catalog_source;
pub mod processor;
pub mod stream_resolver;
