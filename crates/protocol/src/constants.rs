/// Default API root of the remote store.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Maximum aggregate payload of one upload batch (50 MiB).
pub const MAX_BUCKET_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum number of files in one upload batch.
pub const MAX_BUCKET_ITEMS: usize = 5000;

/// Number of buckets the packer starts with.
///
/// Also the natural upload fan-out for small trees: each starting bucket
/// becomes one concurrent upload request.
pub const INITIAL_BUCKET_COUNT: usize = 3;

/// Upper bound on files hashed at the same time during a scan.
pub const HASH_CONCURRENCY: usize = 16;

/// Length of a hex-encoded fingerprint (16 digest bytes).
pub const FINGERPRINT_HEX_LEN: usize = 32;

/// Worker script; never served as a static asset.
pub const WORKER_FILE: &str = "_worker.js";

/// Redirect rules, attached to the deployment instead of uploaded.
pub const REDIRECTS_FILE: &str = "_redirects";

/// Custom header rules, attached to the deployment instead of uploaded.
pub const HEADERS_FILE: &str = "_headers";

/// Routing config for the worker script.
pub const ROUTES_FILE: &str = "_routes.json";

/// File names with platform semantics, excluded from the asset tree at any depth.
pub const RESERVED_FILE_NAMES: [&str; 4] = [WORKER_FILE, REDIRECTS_FILE, HEADERS_FILE, ROUTES_FILE];

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
