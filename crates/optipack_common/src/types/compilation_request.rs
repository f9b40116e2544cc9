use crate::{ModuleDeclaration, SharedOptions, SourceRecord};

/// Everything one pass sends to the external compiler: the flattened source
/// sequence, the module declarations describing it, the entry points, and
/// the normalized configuration. Built fresh per pass and immutable once
/// handed to the invoker.
#[derive(Debug)]
pub struct CompilationRequest {
  pub sources: Vec<SourceRecord>,
  pub modules: Vec<ModuleDeclaration>,
  pub entry_points: Vec<String>,
  pub options: SharedOptions,
}
