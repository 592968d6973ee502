use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub name: String,
    pub channels: usize,
    pub fallbacks: usize,
    pub secs_took: u64,
    pub success: bool,
}

impl SourceStats {
    pub fn success(name: &str, channels: usize, fallbacks: usize, secs_took: u64) -> Self {
        Self { name: name.to_string(), channels, fallbacks, secs_took, success: true }
    }

    pub fn failure(name: &str, secs_took: u64) -> Self {
        Self { name: name.to_string(), channels: 0, fallbacks: 0, secs_took, success: false }
    }
}
