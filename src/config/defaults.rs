/// Configuration default values
///
/// All defaults live here so they can be changed in one place.
// Configuration file
pub const DEFAULT_CONFIG_FILE: &str = "logo-updater.toml";

// Data files
pub const DEFAULT_LOGO_LIST_FILE: &str = "uk_tv_logos.txt";
pub const DEFAULT_SPECIFIC_FIXES_FILE: &str = "specific_channel_fixes.json";
pub const DEFAULT_REPORTS_DIR: &str = "reports";

// Network
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";

// Upload
pub const DEFAULT_DROPBOX_PATH: &str = "/";

/// Environment variables read as configuration, lowercased to config keys
pub const ENV_KEYS: &[&str] = &[
    "INPUT_XML",
    "OUTPUT_XML",
    "INPUT_M3U",
    "OUTPUT_M3U",
    "LOGO_LIST_FILE",
    "SPECIFIC_FIXES_FILE",
    "ALIAS_FILE",
    "REPORTS_DIR",
    "REQUEST_TIMEOUT",
    "DROPBOX_REFRESH_TOKEN",
    "DROPBOX_APP_KEY",
    "DROPBOX_APP_SECRET",
    "DROPBOX_PATH",
];
