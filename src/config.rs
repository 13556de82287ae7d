//! Settings loaded once from a JSON settings file
//!
//! Provides the `Settings` type holding the two flags that govern fetch
//! behavior (`loadFromCache`, `saveToCache`) plus the raw settings payload.
//! Settings are immutable after load, so shared references are safe across
//! threads without synchronization.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::error;

/// Settings key enabling cache-only fetches
const LOAD_FROM_CACHE_KEY: &str = "loadFromCache";

/// Settings key enabling persistence of live responses
const SAVE_TO_CACHE_KEY: &str = "saveToCache";

/// Behavior flags and raw payload from the settings file
///
/// Construct once at startup with [`Settings::load`] and pass by reference
/// (or clone) to whatever performs fetches. A missing or malformed settings
/// file degrades to an empty payload with both flags off rather than
/// aborting.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Full key-value payload of the settings file
    payload: Map<String, Value>,
    /// Serve fetches from the disk cache instead of the network
    load_from_cache: bool,
    /// Persist successful live responses to the disk cache
    save_to_cache: bool,
}

impl Settings {
    /// Loads settings from a JSON file at the given path
    ///
    /// The file must contain a JSON object. The `loadFromCache` and
    /// `saveToCache` keys are read as booleans, each defaulting to `false`
    /// when absent or not boolean-typed. Any failure (missing file,
    /// unreadable contents, non-object JSON) is logged and falls back to
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to read settings file, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(payload)) => Self::from_payload(payload),
            Ok(_) => {
                error!(path = %path.display(), "settings file is not a JSON object, using defaults");
                Self::default()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to parse settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Constructs settings from an in-memory payload
    ///
    /// Useful for tests or when the payload comes from somewhere other than
    /// a file on disk.
    pub fn from_payload(payload: Map<String, Value>) -> Self {
        let load_from_cache = bool_key(&payload, LOAD_FROM_CACHE_KEY);
        let save_to_cache = bool_key(&payload, SAVE_TO_CACHE_KEY);
        Self {
            payload,
            load_from_cache,
            save_to_cache,
        }
    }

    /// Whether fetches should be served from the disk cache
    pub fn load_from_cache(&self) -> bool {
        self.load_from_cache
    }

    /// Whether successful live responses should be written to the disk cache
    pub fn save_to_cache(&self) -> bool {
        self.save_to_cache
    }

    /// Returns the raw payload value for an arbitrary settings key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// Reads a boolean key from the payload, defaulting to `false` when the key
/// is absent or holds a non-boolean value
fn bool_key(payload: &Map<String, Value>, key: &str) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn payload_of(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be a JSON object"),
        }
    }

    fn write_settings_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write settings");
        file
    }

    #[test]
    fn test_both_flags_read_from_file() {
        let file = write_settings_file(r#"{"loadFromCache": true, "saveToCache": true}"#);

        let settings = Settings::load(file.path());

        assert!(settings.load_from_cache());
        assert!(settings.save_to_cache());
    }

    #[test]
    fn test_flags_false_in_file_read_as_false() {
        let file = write_settings_file(r#"{"loadFromCache": false, "saveToCache": false}"#);

        let settings = Settings::load(file.path());

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
    }

    #[test]
    fn test_missing_keys_default_to_false() {
        let file = write_settings_file(r#"{"apiBase": "https://api.example.com"}"#);

        let settings = Settings::load(file.path());

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
    }

    #[test]
    fn test_non_boolean_keys_default_to_false() {
        let file = write_settings_file(r#"{"loadFromCache": "yes", "saveToCache": 1}"#);

        let settings = Settings::load(file.path());

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load("/nonexistent/path/to/settings.json");

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
        assert!(settings.get("anything").is_none());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let file = write_settings_file("not json at all {");

        let settings = Settings::load(file.path());

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
    }

    #[test]
    fn test_non_object_json_falls_back_to_defaults() {
        let file = write_settings_file(r#"[1, 2, 3]"#);

        let settings = Settings::load(file.path());

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
    }

    #[test]
    fn test_from_payload_derives_flags() {
        let settings = Settings::from_payload(payload_of(json!({
            "loadFromCache": true,
            "saveToCache": false,
        })));

        assert!(settings.load_from_cache());
        assert!(!settings.save_to_cache());
    }

    #[test]
    fn test_get_returns_arbitrary_payload_values() {
        let settings = Settings::from_payload(payload_of(json!({
            "loadFromCache": true,
            "apiBase": "https://api.example.com",
            "maxItems": 25,
        })));

        assert_eq!(
            settings.get("apiBase").and_then(Value::as_str),
            Some("https://api.example.com")
        );
        assert_eq!(settings.get("maxItems").and_then(Value::as_u64), Some(25));
        assert!(settings.get("missing").is_none());
    }

    #[test]
    fn test_default_is_empty_with_flags_off() {
        let settings = Settings::default();

        assert!(!settings.load_from_cache());
        assert!(!settings.save_to_cache());
        assert!(settings.get("loadFromCache").is_none());
    }
}
