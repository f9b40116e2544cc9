use serde::Deserialize;

/// One file of the external compiler's stdout payload. `path` encodes which
/// synthetic module the file belongs to (`chunk-<id>.js`, or the base-module
/// marker for the shared runtime). The source map is carried opaquely; this
/// layer only ever rewrites its `file` field.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerOutputFile {
  pub path: String,
  #[serde(rename = "src")]
  pub content: String,
  #[serde(rename = "source_map", default)]
  pub source_map: Option<serde_json::Value>,
}

#[test]
fn test_compiler_output_file_wire_format() {
  let json = r#"[
    {"path":"chunk-1.js","src":"var a=1;","source_map":{"version":3,"mappings":"AAAA"}},
    {"path":"required-base.js","src":"'use strict';"}
  ]"#;
  let files: Vec<CompilerOutputFile> = serde_json::from_str(json).unwrap();
  assert_eq!(files.len(), 2);
  assert_eq!(files[0].path, "chunk-1.js");
  assert!(files[0].source_map.is_some());
  assert!(files[1].source_map.is_none());
}
