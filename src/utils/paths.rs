use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".flight_ledger";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Returns the application-specific data directory, defaulting to `~/.flight_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FLIGHT_LEDGER_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the planner configuration under the given base.
pub fn config_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

/// Canonical configuration file path under the given base.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn config_file_nests_under_config_dir() {
        let path = config_file_in(Path::new("/tmp/planner"));
        assert_eq!(path, PathBuf::from("/tmp/planner/config/config.json"));
    }
}
