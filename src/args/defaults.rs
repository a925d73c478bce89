pub(crate) const DEFAULT_USER_AGENT: &str = concat!("rwrk/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_CONCURRENCY: &str = "1";

pub(crate) const DEFAULT_REQUESTS: &str = "1";
