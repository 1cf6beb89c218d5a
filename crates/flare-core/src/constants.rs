/// Flare version string.
pub const FLARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder replaced by the document id during wildcard addressing.
pub const WILDCARD_ID: &str = "{id}";

/// Placeholder replaced by the rendered revision during wildcard addressing.
pub const WILDCARD_REVISION: &str = "{revision}";

/// Path wildcard names matching the two placeholders above.
pub const WILDCARD_ID_NAME: &str = "id";
pub const WILDCARD_REVISION_NAME: &str = "revision";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "FLARE_LOG";

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = "flare.toml";

/// HTTP methods accepted on subscription endpoints.
pub const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];
