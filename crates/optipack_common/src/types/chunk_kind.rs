/// Whether a chunk carries its own copy of the runtime bootstrap. Entry
/// chunks do and receive the shared preamble after compilation; nested
/// chunks are loaded by an already-running parent and must not.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  EntryPoint,
  #[default]
  Common,
}
