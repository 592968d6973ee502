use std::fmt::Display;

/// Channel ordering of a generated playlist. Parsed case-insensitively,
/// everything that is not `chno` sorts by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMode {
    #[default]
    ChannelNumber,
    Name,
}

impl SortMode {
    const CHNO: &'static str = "chno";
    const NAME: &'static str = "name";
}

impl From<&str> for SortMode {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case(Self::CHNO) {
            Self::ChannelNumber
        } else {
            Self::Name
        }
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SortMode> for String {
    fn from(value: SortMode) -> Self {
        value.to_string()
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", match *self {
            Self::ChannelNumber => Self::CHNO,
            Self::Name => Self::NAME,
        })
    }
}
