pub mod compilation_level;
pub mod language_target;
pub mod normalized_compiler_options;
pub mod warning_level;

use std::time::Duration;

use crate::{CompilationLevel, LanguageTarget, WarningLevel};

/// Caller-facing option surface for the external compiler. Every field is
/// optional; `normalize_options` folds in the defaults once per
/// `Optimizer`.
#[derive(Default, Debug, Clone)]
pub struct CompilerOptions {
  // --- Process
  /// Program plus leading arguments (e.g. a JVM invocation); the first
  /// element is the executable.
  pub compiler_command: Option<Vec<String>>,
  pub process_timeout: Option<Duration>,

  // --- Language
  pub language_in: Option<LanguageTarget>,
  pub language_out: Option<LanguageTarget>,
  pub compilation_level: Option<CompilationLevel>,
  pub warning_level: Option<WarningLevel>,

  // --- Compilation inputs
  pub externs: Option<Vec<String>>,
  pub defines: Option<Vec<String>>,
  /// Overrides the entry points derived from the chunk tree's root chunks.
  pub entry_points: Option<Vec<String>>,
  pub rename_prefix_namespace: Option<String>,

  // --- Runtime
  /// Shared bootstrap text compiled once as the synthetic root module and
  /// prepended to every runtime-bearing chunk.
  pub runtime_preamble: Option<String>,
  /// Value of the generated public-path `define` symbol.
  pub public_path: Option<String>,
}
