use oxc_index::IndexVec;

use crate::{Chunk, ChunkIdx, Module, ModuleIdx};

/// Read-only view of the bundler's finalized chunk tree for one optimize
/// pass. Nothing here is retained past the end of the pass, and repeated
/// chunk visits are the caller's contract to avoid.
#[derive(Debug, Default)]
pub struct ChunkGraph {
  pub chunks: IndexVec<ChunkIdx, Chunk>,
  pub modules: IndexVec<ModuleIdx, Module>,
  /// Chunks with no parent chunk, in entry order.
  pub root_chunks: Vec<ChunkIdx>,
}

impl ChunkGraph {
  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    self.chunks.push(chunk)
  }

  pub fn add_module(&mut self, chunk_idx: ChunkIdx, module: Module) -> ModuleIdx {
    let module_idx = self.modules.push(module);
    self.chunks[chunk_idx].modules.push(module_idx);
    module_idx
  }

  /// Resolves a bundler-assigned numeric id back to a live chunk, e.g. when
  /// matching a `chunk-<id>.js` compiler output file.
  pub fn chunk_by_id(&self, id: u32) -> Option<&Chunk> {
    self.chunks.iter().find(|chunk| chunk.id == id)
  }
}
