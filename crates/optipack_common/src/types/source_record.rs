use serde::{Deserialize, Serialize};

/// Sanitized path the bundler gives its internal no-op modules.
pub const IGNORED_MODULE_PATH: &str = "__ignored__";
/// Marker comment those modules carry as their entire source.
pub const IGNORED_MODULE_MARKER: &str = "/* (ignored) */";

/// One module's compilable text as fed to the external compiler. `content`
/// travels as `src` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
  pub path: String,
  #[serde(rename = "src")]
  pub content: String,
}

impl SourceRecord {
  pub fn new(path: String, content: String) -> Self {
    Self { path, content }
  }

  /// Bundler-internal no-op modules are dropped from the flattened
  /// sequence entirely. Both the sentinel path and the marker content must
  /// match; either alone is a legitimate user module.
  pub fn is_ignored(&self) -> bool {
    self.path == IGNORED_MODULE_PATH && self.content.trim() == IGNORED_MODULE_MARKER
  }
}

#[test]
fn test_source_record_wire_format() {
  let record = SourceRecord::new("src/a.js".to_string(), "var a;".to_string());
  let json = serde_json::to_string(&record).unwrap();
  assert_eq!(json, r#"{"path":"src/a.js","src":"var a;"}"#);

  let parsed: SourceRecord = serde_json::from_str(&json).unwrap();
  assert_eq!(parsed, record);
}

#[test]
fn test_is_ignored_requires_both_sentinel_and_marker() {
  let ignored =
    SourceRecord::new(IGNORED_MODULE_PATH.to_string(), format!("{IGNORED_MODULE_MARKER}\n"));
  assert!(ignored.is_ignored());

  let path_only = SourceRecord::new(IGNORED_MODULE_PATH.to_string(), "var a;".to_string());
  assert!(!path_only.is_ignored());

  let marker_only = SourceRecord::new("src/a.js".to_string(), IGNORED_MODULE_MARKER.to_string());
  assert!(!marker_only.is_ignored());
}
