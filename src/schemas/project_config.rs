// The project-level configuration file (`dcm_global.yaml`) that `auto`
// version detection reads the accepted DCM version range from.

use crate::log_debug;
use crate::schemas::errors::ResolutionError;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Default name of the configuration file at the repository root.
pub const DEFAULT_CONFIG_FILE: &str = "dcm_global.yaml";

/// Reads `<root>/<file_name>` and returns its `version` entry.
///
/// Only the top-level `version` key is inspected; the rest of the document
/// belongs to DCM itself and is left alone. The key must hold a non-empty
/// string.
pub fn read_version_range(root: &Path, file_name: &str) -> Result<String, ResolutionError> {
    let path = root.join(file_name);
    log_debug!("[Config] Reading version range from {}", path.display());

    if !path.is_file() {
        return Err(ResolutionError::ConfigMissing(path));
    }

    let contents = fs::read_to_string(&path).map_err(|source| ResolutionError::ConfigUnreadable {
        path: path.clone(),
        source,
    })?;

    version_range_from_yaml(&contents)
}

fn version_range_from_yaml(contents: &str) -> Result<String, ResolutionError> {
    let document: Value = serde_yaml::from_str(contents)
        .map_err(|e| ResolutionError::RangeUnparsable(format!("invalid YAML ({e})")))?;

    match document.get("version") {
        Some(Value::String(range)) if !range.trim().is_empty() => Ok(range.trim().to_string()),
        Some(Value::String(_)) => Err(ResolutionError::RangeUnparsable(
            "'version' is empty".to_string(),
        )),
        Some(other) => Err(ResolutionError::RangeUnparsable(format!(
            "'version' must be a string, found {}",
            describe(other)
        ))),
        None => Err(ResolutionError::RangeUnparsable(
            "'version' is not set".to_string(),
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
