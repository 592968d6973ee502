pub(crate) fn default_as_true() -> bool { true }

pub(crate) fn default_connect_timeout_secs() -> u64 { 10 }

pub(crate) fn default_timeout_secs() -> u64 { 30 }
