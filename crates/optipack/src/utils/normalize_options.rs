use optipack_common::{CompilerOptions, LanguageTarget, NormalizedCompilerOptions};

/// Name of the external compiler executable looked up on `PATH` when the
/// caller did not configure a command.
const DEFAULT_COMPILER_PROGRAM: &str = "closure-compiler";

pub fn normalize_options(mut raw_options: CompilerOptions) -> NormalizedCompilerOptions {
  let compiler_command = match std::mem::take(&mut raw_options.compiler_command) {
    Some(command) if !command.is_empty() => command,
    _ => vec![DEFAULT_COMPILER_PROGRAM.to_string()],
  };

  NormalizedCompilerOptions {
    compiler_command,
    process_timeout: raw_options.process_timeout,
    language_in: raw_options.language_in.unwrap_or_default(),
    language_out: raw_options.language_out.unwrap_or(LanguageTarget::Es5Strict),
    compilation_level: raw_options.compilation_level.unwrap_or_default(),
    warning_level: raw_options.warning_level.unwrap_or_default(),
    externs: raw_options.externs.unwrap_or_default(),
    defines: raw_options.defines.unwrap_or_default(),
    entry_points: raw_options.entry_points.unwrap_or_default(),
    rename_prefix_namespace: raw_options.rename_prefix_namespace,
    runtime_preamble: raw_options.runtime_preamble.unwrap_or_default(),
    public_path: raw_options.public_path,
  }
}

#[test]
fn test_defaults_follow_the_compiler_contract() {
  let options = normalize_options(CompilerOptions::default());
  assert_eq!(options.language_in.flag_value(), "ECMASCRIPT_NEXT");
  assert_eq!(options.language_out.flag_value(), "ECMASCRIPT5_STRICT");
  assert_eq!(options.compilation_level.flag_value(), "SIMPLE");
  assert_eq!(options.warning_level.flag_value(), "VERBOSE");
  assert_eq!(options.program(), DEFAULT_COMPILER_PROGRAM);
  assert!(options.runtime_preamble.is_empty());
}

#[test]
fn test_empty_compiler_command_falls_back_to_the_default() {
  let raw = CompilerOptions { compiler_command: Some(vec![]), ..CompilerOptions::default() };
  let options = normalize_options(raw);
  assert_eq!(options.program(), DEFAULT_COMPILER_PROGRAM);
  assert!(options.leading_args().is_empty());
}
