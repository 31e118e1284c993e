// Script locator: turn the path given on the command line into the text
// that gets uploaded. The content is never parsed or validated.

use crate::error::DeployError;
use std::fs;
use std::path::{Path, PathBuf};

/// Entry point used when `wrangler.toml` is absent or has no `main` line.
pub const DEFAULT_ENTRY: &str = "src/index.js";

/// Build config file, looked up next to the script directory.
pub const BUILD_CONFIG: &str = "wrangler.toml";

const SCRIPT_EXTENSION: &str = "js";
const ENTRY_KEY: &str = "main";

/// Return the `main` entry declared in a wrangler.toml body.
///
/// Lines are read as `key = value`. The first line whose trimmed key is
/// `main` wins; its value is trimmed and stripped of surrounding quotes.
/// No TOML parsing beyond that.
pub fn parse_main_entry(config: &str) -> Option<String> {
    config.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() != ENTRY_KEY {
            return None;
        }
        Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
    })
}

/// Entry point for a script directory, from `../wrangler.toml` or the default.
pub fn entry_point(dir: &Path) -> Result<PathBuf, DeployError> {
    let config_path = dir
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(BUILD_CONFIG);

    let entry = if config_path.is_file() {
        let text = fs::read_to_string(&config_path)?;
        parse_main_entry(&text)
    } else {
        None
    };

    match entry {
        Some(entry) => {
            log::debug!("Entry point {} from {}", entry, config_path.display());
            Ok(PathBuf::from(entry))
        }
        None => Ok(PathBuf::from(DEFAULT_ENTRY)),
    }
}

/// Read the script to deploy from `path`, a `.js` file or a project's
/// script directory.
pub fn locate_script(path: &Path) -> Result<String, DeployError> {
    if path.is_file() && path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION) {
        return Ok(fs::read_to_string(path)?);
    }

    if path.is_dir() {
        let full_path = path.join(entry_point(path)?);
        if full_path.exists() {
            log::debug!("Using entry point {}", full_path.display());
            return Ok(fs::read_to_string(full_path)?);
        }
    }

    Err(DeployError::ScriptNotFound {
        path: path.to_path_buf(),
    })
}
