use std::sync::LazyLock;

use optipack_common::{AssetMap, BASE_MODULE_NAME, ChunkGraph, CompilerOutputFile, OptimizedAsset};
use optipack_sourcemap::{Source, SourceJoiner};
use regex::Regex;
use serde_json::Value;

/// `chunk-<id>.js`, the naming convention tying a compiler output file back
/// to the chunk it was flattened from.
static CHUNK_OUTPUT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?:^|/)chunk-(\d+)\.js$").unwrap());

/// A base module compiled down to nothing but the language-mode directive
/// carries no runtime worth duplicating into every entry chunk.
const STRICT_DIRECTIVE: &str = "'use strict';";

/// Matches compiler output files to live chunks and replaces their assets.
pub struct RemapStage<'pass> {
  graph: &'pass ChunkGraph,
}

impl<'pass> RemapStage<'pass> {
  pub fn new(graph: &'pass ChunkGraph) -> Self {
    Self { graph }
  }

  /// Replaces the asset of every chunk the compiler produced output for and
  /// returns the replaced keys. Output files whose chunk no longer exists,
  /// or whose chunk emitted no files, are skipped without error.
  pub fn remap(&self, output_files: &[CompilerOutputFile], assets: &mut AssetMap) -> Vec<String> {
    let preamble = shared_preamble(output_files);
    let mut replaced = Vec::new();

    for output_file in output_files {
      let Some(chunk_id) = chunk_id_of(&output_file.path) else { continue };
      let Some(chunk) = self.graph.chunk_by_id(chunk_id) else {
        log::debug!("no live chunk for compiler output `{}`", output_file.path);
        continue;
      };
      let Some(asset_key) = chunk.primary_file() else {
        log::debug!("chunk {chunk_id} emitted no files, skipping `{}`", output_file.path);
        continue;
      };

      let content = if chunk.has_own_runtime() && !preamble.is_empty() {
        log::debug!(
          "prepending {} preamble lines to `{asset_key}`",
          preamble.lines_count() + 1
        );
        let mut joiner = SourceJoiner::default();
        joiner.append_source(output_file.content.as_str());
        joiner.prepend_source(preamble);
        joiner.join()
      } else {
        output_file.content.clone()
      };

      let source_map = finalize_source_map(output_file.source_map.clone(), asset_key);
      assets.insert(asset_key.to_string(), OptimizedAsset { content, source_map });
      replaced.push(asset_key.to_string());
    }

    replaced
  }
}

/// The output file carrying the synthetic root supplies the preamble shared
/// by every runtime-bearing chunk.
fn shared_preamble(output_files: &[CompilerOutputFile]) -> &str {
  match output_files.iter().find(|output_file| output_file.path.contains(BASE_MODULE_NAME)) {
    Some(base) if base.content.trim() != STRICT_DIRECTIVE => &base.content,
    _ => "",
  }
}

fn chunk_id_of(path: &str) -> Option<u32> {
  CHUNK_OUTPUT_RE.captures(path)?.get(1)?.as_str().parse().ok()
}

/// Rewrites the compiler map's `file` field to the asset key the map now
/// describes. Maps may arrive inline or as a JSON-encoded string.
fn finalize_source_map(source_map: Option<Value>, asset_key: &str) -> Option<Value> {
  let mut source_map = match source_map {
    Some(Value::String(raw)) => serde_json::from_str(&raw).ok()?,
    Some(value) => value,
    None => return None,
  };
  if let Value::Object(fields) = &mut source_map {
    fields.insert("file".to_string(), Value::String(asset_key.to_string()));
  }
  Some(source_map)
}

#[cfg(test)]
use optipack_common::{Chunk, ChunkKind};
#[cfg(test)]
use serde_json::json;

#[cfg(test)]
fn test_graph() -> ChunkGraph {
  let mut graph = ChunkGraph::default();
  let entry =
    graph.add_chunk(Chunk::new(3, None, ChunkKind::EntryPoint, vec!["main.js".to_string()]));
  let nested =
    graph.add_chunk(Chunk::new(4, None, ChunkKind::Common, vec!["4.main.js".to_string()]));
  let pruned = graph.add_chunk(Chunk::new(5, None, ChunkKind::Common, vec![]));
  graph.chunks[entry].children.push(nested);
  graph.chunks[entry].children.push(pruned);
  graph.root_chunks = vec![entry];
  graph
}

#[cfg(test)]
fn output_file(path: &str, content: &str, source_map: Option<Value>) -> CompilerOutputFile {
  CompilerOutputFile { path: path.to_string(), content: content.to_string(), source_map }
}

#[test]
fn test_matched_chunk_replaces_its_first_asset() {
  let graph = test_graph();
  let mut assets = AssetMap::default();
  assets.insert(
    "main.js".to_string(),
    OptimizedAsset { content: "unoptimized".to_string(), source_map: None },
  );

  let files = vec![output_file(
    "chunk-3.js",
    "var a=1;",
    Some(json!({"version": 3, "mappings": "AAAA"})),
  )];
  let replaced = RemapStage::new(&graph).remap(&files, &mut assets);

  assert_eq!(replaced, vec!["main.js"]);
  let asset = &assets["main.js"];
  assert_eq!(asset.content, "var a=1;");
  assert_eq!(asset.source_map.as_ref().unwrap()["file"], json!("main.js"));
}

#[test]
fn test_unmatched_chunk_id_is_skipped_silently() {
  let graph = test_graph();
  let mut assets = AssetMap::default();
  assets.insert(
    "main.js".to_string(),
    OptimizedAsset { content: "unoptimized".to_string(), source_map: None },
  );

  let files = vec![output_file("chunk-99.js", "var gone;", None)];
  let replaced = RemapStage::new(&graph).remap(&files, &mut assets);

  assert!(replaced.is_empty());
  assert_eq!(assets["main.js"].content, "unoptimized");
}

#[test]
fn test_pruned_chunk_without_files_is_skipped() {
  let graph = test_graph();
  let mut assets = AssetMap::default();

  let files = vec![output_file("chunk-5.js", "var pruned;", None)];
  let replaced = RemapStage::new(&graph).remap(&files, &mut assets);

  assert!(replaced.is_empty());
  assert!(assets.is_empty());
}

#[test]
fn test_preamble_goes_only_to_runtime_bearing_chunks() {
  let graph = test_graph();
  let mut assets = AssetMap::default();

  let files = vec![
    output_file("required-base.js", "function runtime(){}", None),
    output_file("chunk-3.js", "entry();", None),
    output_file("chunk-4.js", "nested();", None),
  ];
  RemapStage::new(&graph).remap(&files, &mut assets);

  assert_eq!(assets["main.js"].content, "function runtime(){}\nentry();");
  assert_eq!(assets["4.main.js"].content, "nested();");
}

#[test]
fn test_trivial_strict_directive_base_yields_no_preamble() {
  let graph = test_graph();
  let mut assets = AssetMap::default();

  let files = vec![
    output_file("required-base.js", "'use strict';", None),
    output_file("chunk-3.js", "entry();", None),
  ];
  RemapStage::new(&graph).remap(&files, &mut assets);

  assert_eq!(assets["main.js"].content, "entry();");
}

#[test]
fn test_string_encoded_source_map_is_decoded_before_rewriting() {
  let graph = test_graph();
  let mut assets = AssetMap::default();

  let encoded = r#"{"version":3,"file":"chunk-3.js","mappings":"AAAA"}"#;
  let files =
    vec![output_file("chunk-3.js", "entry();", Some(Value::String(encoded.to_string())))];
  RemapStage::new(&graph).remap(&files, &mut assets);

  let map = assets["main.js"].source_map.as_ref().unwrap();
  assert_eq!(map["file"], json!("main.js"));
  assert_eq!(map["version"], json!(3));
}

#[test]
fn test_chunk_id_of_requires_the_exact_naming_convention() {
  assert_eq!(chunk_id_of("chunk-12.js"), Some(12));
  assert_eq!(chunk_id_of("dist/chunk-0.js"), Some(0));
  assert_eq!(chunk_id_of("required-base.js"), None);
  assert_eq!(chunk_id_of("mychunk-1.js"), None);
  assert_eq!(chunk_id_of("chunk-1.js.map"), None);
}
