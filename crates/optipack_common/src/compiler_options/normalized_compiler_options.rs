use std::sync::Arc;
use std::time::Duration;

use crate::{CompilationLevel, LanguageTarget, WarningLevel};

#[derive(Debug)]
pub struct NormalizedCompilerOptions {
  // --- Process
  pub compiler_command: Vec<String>,
  pub process_timeout: Option<Duration>,

  // --- Language
  pub language_in: LanguageTarget,
  pub language_out: LanguageTarget,
  pub compilation_level: CompilationLevel,
  pub warning_level: WarningLevel,

  // --- Compilation inputs
  pub externs: Vec<String>,
  pub defines: Vec<String>,
  pub entry_points: Vec<String>,
  pub rename_prefix_namespace: Option<String>,

  // --- Runtime
  pub runtime_preamble: String,
  pub public_path: Option<String>,
}

pub type SharedOptions = Arc<NormalizedCompilerOptions>;

impl NormalizedCompilerOptions {
  /// Executable of the external compiler. Normalization guarantees the
  /// command is non-empty.
  pub fn program(&self) -> &str {
    &self.compiler_command[0]
  }

  /// Arguments baked into the compiler command itself, before any generated
  /// flags.
  pub fn leading_args(&self) -> &[String] {
    &self.compiler_command[1..]
  }
}
