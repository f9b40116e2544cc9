mod chunk;
mod compiler_options;
mod module;
mod types;

pub use compiler_options::{
  CompilerOptions, compilation_level::CompilationLevel, language_target::LanguageTarget,
  normalized_compiler_options::{NormalizedCompilerOptions, SharedOptions},
  warning_level::WarningLevel,
};

pub use crate::{
  chunk::{Chunk, chunk_graph::ChunkGraph},
  module::{DependencyKind, Module},
  types::{
    asset::{AssetMap, OptimizedAsset},
    chunk_kind::ChunkKind,
    compilation_request::CompilationRequest,
    compiler_output_file::CompilerOutputFile,
    diagnostic::{DiagnosticRecord, DiagnosticSeverity},
    module_declaration::{BASE_MODULE_NAME, BASE_SOURCE_PATH, ModuleDeclaration},
    raw_idx::{ChunkIdx, ModuleIdx},
    renderer::{DependencyRenderer, RendererTable},
    source_record::{IGNORED_MODULE_MARKER, IGNORED_MODULE_PATH, SourceRecord},
  },
};
