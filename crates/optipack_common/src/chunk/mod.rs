pub mod chunk_graph;

use arcstr::ArcStr;

use crate::{ChunkIdx, ChunkKind, ModuleIdx};

/// One bundler-produced group of modules, emitted together. Chunks form a
/// tree through `children`; the bundler owns the tree and this workspace
/// only reads it during a single optimize pass.
#[derive(Debug, Default)]
pub struct Chunk {
  /// Numeric identifier assigned by the bundler; also the `<id>` of the
  /// `chunk-<id>` name this chunk is declared under.
  pub id: u32,
  pub name: Option<ArcStr>,
  pub kind: ChunkKind,
  pub modules: Vec<ModuleIdx>,
  pub children: Vec<ChunkIdx>,
  /// Output file names the bundler emitted for this chunk, in emission
  /// order. The first one is the asset key a remapped chunk replaces.
  pub files: Vec<String>,
}

impl Chunk {
  pub fn new(id: u32, name: Option<ArcStr>, kind: ChunkKind, files: Vec<String>) -> Self {
    Self { id, name, kind, files, ..Self::default() }
  }

  /// Name under which this chunk is declared to the external compiler's
  /// module system.
  pub fn declared_name(&self) -> String {
    format!("chunk-{}", self.id)
  }

  pub fn has_own_runtime(&self) -> bool {
    matches!(self.kind, ChunkKind::EntryPoint)
  }

  pub fn primary_file(&self) -> Option<&str> {
    self.files.first().map(String::as_str)
  }
}

#[test]
fn test_declared_name_follows_the_output_naming_convention() {
  let chunk = Chunk::new(7, None, ChunkKind::Common, vec![]);
  assert_eq!(chunk.declared_name(), "chunk-7");
}
