use std::sync::Arc;

use optipack_common::{
  AssetMap, ChunkGraph, CompilationRequest, CompilerOptions, CompilerOutputFile, SharedOptions,
};
use optipack_error::{BuildResult, launch_failure};

use crate::{
  diagnostics::{parse_diagnostics, report::report_diagnostics},
  stages::{
    flatten::FlattenStage,
    invoke::{CompilerInvoker, CompilerOutcome},
    remap::RemapStage,
  },
  types::pass_output::PassOutput,
  utils::normalize_options::normalize_options,
};

/// Drives optimize passes over finalized chunk graphs. Options are
/// normalized once; every pass gets a fresh allocator, a fresh request and
/// a fresh subprocess, so passes are independent of each other.
pub struct Optimizer {
  options: SharedOptions,
}

impl Optimizer {
  pub fn new(options: CompilerOptions) -> Self {
    Self { options: Arc::new(normalize_options(options)) }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  /// Runs one optimize pass: flattens the chunk tree, drives the external
  /// compiler over it, surfaces its diagnostics and replaces the assets of
  /// every chunk it optimized.
  ///
  /// Compiler-level failure (launch failure, non-zero exit) is fatal for
  /// the pass but recoverable for the host: no assets are touched and the
  /// reason lands in [`PassOutput::errors`]. `Err` is reserved for
  /// host-level defects such as unparseable compiler output on a success
  /// exit.
  pub async fn run_pass(
    &self,
    graph: &ChunkGraph,
    assets: &mut AssetMap,
  ) -> BuildResult<PassOutput> {
    let flattened = FlattenStage::new(graph, &self.options).flatten();

    let entry_points = if self.options.entry_points.is_empty() {
      flattened.entry_points
    } else {
      self.options.entry_points.clone()
    };

    let request = CompilationRequest {
      sources: flattened.sources,
      modules: flattened.module_declarations,
      entry_points,
      options: Arc::clone(&self.options),
    };

    let mut output = PassOutput::default();
    match CompilerInvoker::new(&request).invoke().await {
      CompilerOutcome::LaunchFailed { command_line, cause } => {
        output.errors.push(launch_failure(&command_line, &cause));
      }
      CompilerOutcome::Exited { exit_code, stdout, stderr } => {
        report_diagnostics(parse_diagnostics(&stderr), &mut output);

        if exit_code != 0 {
          // Diagnostics, if any, were already surfaced above; a silent
          // failure still needs a marker the host can act on.
          if output.errors.is_empty() {
            output.errors.push(anyhow::anyhow!(
              "external compiler exited with status {exit_code} and no diagnostics"
            ));
          }
          return Ok(output);
        }

        let output_files: Vec<CompilerOutputFile> =
          serde_json::from_str(&stdout).map_err(|error| {
            anyhow::anyhow!("external compiler emitted unparseable output: {error}")
          })?;
        output.replaced = RemapStage::new(graph).remap(&output_files, assets);
      }
    }

    Ok(output)
  }
}

#[cfg(test)]
use optipack_common::{Chunk, ChunkKind, Module, OptimizedAsset};

#[cfg(test)]
fn two_entry_graph() -> ChunkGraph {
  let mut graph = ChunkGraph::default();
  let first =
    graph.add_chunk(Chunk::new(1, None, ChunkKind::EntryPoint, vec!["main1.js".to_string()]));
  graph.add_module(first, Module::new(Some("src/a.js".into()), Some("var a = 1;".into())));
  let second =
    graph.add_chunk(Chunk::new(2, None, ChunkKind::EntryPoint, vec!["main2.js".to_string()]));
  graph.add_module(second, Module::new(Some("src/b.js".into()), Some("var b = 2;".into())));
  graph.root_chunks = vec![first, second];
  graph
}

#[cfg(test)]
fn seeded_assets() -> AssetMap {
  let mut assets = AssetMap::default();
  for key in ["main1.js", "main2.js"] {
    assets.insert(
      key.to_string(),
      OptimizedAsset { content: "unoptimized".to_string(), source_map: None },
    );
  }
  assets
}

#[cfg(test)]
fn fake_compiler(script: &str) -> Optimizer {
  Optimizer::new(CompilerOptions {
    compiler_command: Some(vec!["sh".to_string(), "-c".to_string(), script.to_string()]),
    ..CompilerOptions::default()
  })
}

#[cfg(unix)]
#[tokio::test]
async fn test_successful_pass_replaces_every_matched_asset() {
  let script = r#"cat >/dev/null; printf '%s' '[
    {"path":"required-base.js","src":"function runtime(){}"},
    {"path":"chunk-1.js","src":"var a=1;","source_map":{"version":3,"mappings":"AAAA"}},
    {"path":"chunk-2.js","src":"var b=2;"}
  ]'"#;
  let optimizer = fake_compiler(script);
  let graph = two_entry_graph();
  let mut assets = seeded_assets();

  let output = optimizer.run_pass(&graph, &mut assets).await.unwrap();

  assert_eq!(output.replaced, vec!["main1.js", "main2.js"]);
  assert!(output.errors.is_empty());
  assert!(output.warnings.is_empty());
  // Both chunks carry their own runtime, so both get the shared preamble.
  assert_eq!(assets["main1.js"].content, "function runtime(){}\nvar a=1;");
  assert_eq!(assets["main2.js"].content, "function runtime(){}\nvar b=2;");
  assert_eq!(
    assets["main1.js"].source_map.as_ref().unwrap()["file"],
    serde_json::json!("main1.js")
  );
}

#[cfg(unix)]
#[tokio::test]
async fn test_warnings_on_a_clean_exit_do_not_block_replacement() {
  let script = r#"cat >/dev/null; echo "src/a.js:1: WARNING - suspicious" >&2; printf '%s' '[{"path":"chunk-1.js","src":"var a=1;"}]'"#;
  let optimizer = fake_compiler(script);
  let graph = two_entry_graph();
  let mut assets = seeded_assets();

  let output = optimizer.run_pass(&graph, &mut assets).await.unwrap();

  assert_eq!(output.warnings.len(), 1);
  assert!(output.errors.is_empty());
  assert_eq!(output.replaced, vec!["main1.js"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_nonzero_exit_aborts_replacement_but_reports_diagnostics() {
  let script = r#"cat >/dev/null; echo "src/a.js:1: ERROR - bad code" >&2; exit 2"#;
  let optimizer = fake_compiler(script);
  let graph = two_entry_graph();
  let mut assets = seeded_assets();

  let output = optimizer.run_pass(&graph, &mut assets).await.unwrap();

  assert!(output.replaced.is_empty());
  assert_eq!(output.errors.len(), 1);
  assert!(output.errors[0].to_string().contains("bad code"));
  assert_eq!(assets["main1.js"].content, "unoptimized");
}

#[cfg(unix)]
#[tokio::test]
async fn test_silent_nonzero_exit_reports_an_unknown_failure_marker() {
  let optimizer = fake_compiler("cat >/dev/null; exit 9");
  let graph = two_entry_graph();
  let mut assets = seeded_assets();

  let output = optimizer.run_pass(&graph, &mut assets).await.unwrap();

  assert!(output.replaced.is_empty());
  assert_eq!(output.errors.len(), 1);
  assert!(output.errors[0].to_string().contains("status 9"));
}

#[tokio::test]
async fn test_launch_failure_is_one_error_and_zero_replacements() {
  let optimizer = Optimizer::new(CompilerOptions {
    compiler_command: Some(vec!["/definitely/not/a/compiler".to_string()]),
    ..CompilerOptions::default()
  });
  let graph = two_entry_graph();
  let mut assets = seeded_assets();

  let output = optimizer.run_pass(&graph, &mut assets).await.unwrap();

  assert!(output.replaced.is_empty());
  assert_eq!(output.errors.len(), 1);
  assert!(output.errors[0].to_string().contains("/definitely/not/a/compiler"));
  assert_eq!(assets["main1.js"].content, "unoptimized");
}

#[cfg(unix)]
#[tokio::test]
async fn test_unparseable_stdout_on_success_is_a_host_level_defect() {
  let optimizer = fake_compiler("cat >/dev/null; printf '%s' 'not json'");
  let graph = two_entry_graph();
  let mut assets = seeded_assets();

  let error = optimizer.run_pass(&graph, &mut assets).await.unwrap_err();
  assert!(error[0].to_string().contains("unparseable output"));
}
