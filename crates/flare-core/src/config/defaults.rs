// Single source of truth for all default values.

// --- Worker ---
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_PROCESS_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PUSH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1_024;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

// --- Delivery ---
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SUCCESS_STATUSES: [u16; 4] = [200, 201, 202, 204];

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
