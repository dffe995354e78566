/// Persisted snapshot keys
pub const ALERTS_KEY: &str = "rtwqms_alerts";
pub const AGGREGATE_KEY: &str = "rtwqms_aggregate_data";

/// HMPI status thresholds (upper bound of Good, upper bound of Bad)
pub const HMPI_GOOD_MAX: f64 = 25.0;
pub const HMPI_BAD_MAX: f64 = 75.0;

/// Number of metals reported in `stats.top_metals`
pub const TOP_METALS_LIMIT: usize = 3;

/// District bucket for rows without a district
pub const DEFAULT_DISTRICT: &str = "Unknown District";

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4;
pub const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_STORE_DIR: &str = ".rtwqms";
pub const DEFAULT_CONFIG_FILE: &str = "rtwqms.toml";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "RTWQMS";

/// CSV column names
pub const COL_STATION_ID: &str = "station_id";
pub const COL_STATION_NAME: &str = "station_name";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_DISTRICT: &str = "district";
pub const COL_TIMESTAMP: &str = "timestamp";
