use optipack_utils::indexmap::FxIndexMap;

/// Replacement asset for one chunk: the optimized text plus the compiler's
/// source map with its `file` field rewritten to the asset key.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedAsset {
  pub content: String,
  pub source_map: Option<serde_json::Value>,
}

/// The bundler's asset collection, keyed by output filename. Replacement
/// granularity is one whole entry per key; there are no partial overwrites.
pub type AssetMap = FxIndexMap<String, OptimizedAsset>;
