/// Default input and output locations, applied by the configuration layer only
pub const DEFAULT_JSON_FILE: &str = "F-A0010-001.json";
pub const DEFAULT_DB_FILE: &str = "data.db";

/// Optional configuration file name and environment prefix
pub const CONFIG_FILE_STEM: &str = "cwa-temps";
pub const ENV_PREFIX: &str = "CWA_TEMPS";

/// Keys from the document root down to the location array
pub const FEED_ROOT_PATH: [&str; 7] = [
    "cwaopendata",
    "resources",
    "resource",
    "data",
    "agrWeatherForecasts",
    "weatherForecasts",
    "location",
];

/// Weather element names
pub const MAX_TEMP_ELEMENT: &str = "MaxT";
pub const MIN_TEMP_ELEMENT: &str = "MinT";

/// Date format used by `dataDate` and the viewer filters
pub const DATE_FORMAT: &str = "%Y-%m-%d";
