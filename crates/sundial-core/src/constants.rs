/// Content type declared on multistatus responses.
pub const MULTISTATUS_CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

/// Default href prefix for calendar object resources.
pub const DEFAULT_DAV_PREFIX: &str = "/dav";

/// Default bound on a single store adapter call, in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
