/// Application name
pub const APP_NAME: &str = "bootkit";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the configuration section holding engine options
pub const OPTIONS_SECTION: &str = "bootkit";
