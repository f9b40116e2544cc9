pub mod renderers;

use optipack_common::{
  BASE_MODULE_NAME, BASE_SOURCE_PATH, ChunkGraph, ChunkIdx, ModuleDeclaration,
  NormalizedCompilerOptions, RendererTable, SourceRecord,
};
use optipack_utils::{
  indexmap::FxIndexSet, placeholder_name::NameAllocator,
  sanitize_source_path::sanitize_source_path,
};

/// Product of flattening one chunk tree: the ordered source sequence, the
/// module declarations describing it, and the entry points derived from the
/// root chunks.
#[derive(Debug)]
pub struct FlattenOutput {
  pub sources: Vec<SourceRecord>,
  pub module_declarations: Vec<ModuleDeclaration>,
  pub entry_points: Vec<String>,
}

/// Walks the chunk tree depth-first, parent before children, and linearizes
/// it into the form the external compiler's module system consumes. All
/// counters and bookkeeping live on the stage value; nothing survives the
/// pass.
pub struct FlattenStage<'pass> {
  graph: &'pass ChunkGraph,
  options: &'pass NormalizedCompilerOptions,
  renderers: RendererTable,
  allocator: NameAllocator,
  emitted_paths: FxIndexSet<String>,
  sources: Vec<SourceRecord>,
  module_declarations: Vec<ModuleDeclaration>,
  entry_points: Vec<String>,
}

impl<'pass> FlattenStage<'pass> {
  pub fn new(graph: &'pass ChunkGraph, options: &'pass NormalizedCompilerOptions) -> Self {
    Self {
      graph,
      options,
      renderers: renderers::renderer_table(),
      allocator: NameAllocator::default(),
      emitted_paths: FxIndexSet::default(),
      sources: Vec::new(),
      module_declarations: Vec::new(),
      entry_points: Vec::new(),
    }
  }

  pub fn flatten(mut self) -> FlattenOutput {
    let graph = self.graph;

    // The synthetic root comes first so the compiler sees the shared
    // runtime before anything that depends on it.
    self.push_record(SourceRecord::new(
      BASE_SOURCE_PATH.to_string(),
      self.options.runtime_preamble.clone(),
    ));
    self.module_declarations.push(ModuleDeclaration::new(BASE_MODULE_NAME.to_string(), 1, None));

    for &chunk_idx in &graph.root_chunks {
      self.collect_entry_point(chunk_idx);
      self.flatten_chunk(chunk_idx, BASE_MODULE_NAME.to_string());
    }

    debug_assert_eq!(
      self.module_declarations.iter().map(|declaration| declaration.source_count).sum::<usize>(),
      self.sources.len()
    );

    log::debug!(
      "flattened {} chunks into {} source records",
      self.module_declarations.len() - 1,
      self.sources.len()
    );

    FlattenOutput {
      sources: self.sources,
      module_declarations: self.module_declarations,
      entry_points: self.entry_points,
    }
  }

  fn flatten_chunk(&mut self, chunk_idx: ChunkIdx, parent_name: String) {
    let graph = self.graph;
    let chunk = &graph.chunks[chunk_idx];
    let declared_name = chunk.declared_name();

    let mut emitted = 0usize;
    for &module_idx in &chunk.modules {
      let module = &graph.modules[module_idx];
      let path = match &module.path {
        Some(path) => sanitize_source_path(path),
        None => self.allocator.allocate("unknown"),
      };
      // A module whose source the bundler cannot provide still occupies its
      // slot in the sequence, just with empty text.
      let content = module.source.as_deref().map_or_else(String::new, |source| {
        self.renderers.render(module.dependency_kind, source).into_owned()
      });

      let record = SourceRecord::new(path, content);
      if record.is_ignored() {
        continue;
      }
      self.push_record(record);
      emitted += 1;
    }

    if emitted == 0 {
      // The compiler rejects zero-source module declarations; structurally
      // empty chunks get a placeholder record instead.
      let placeholder = self.allocator.allocate("empty");
      self.push_record(SourceRecord::new(placeholder, String::new()));
      emitted = 1;
    }

    self
      .module_declarations
      .push(ModuleDeclaration::new(declared_name.clone(), emitted, Some(parent_name)));

    // Children strictly after the parent's own sources, so every dependent
    // is declared after everything it depends on.
    for &child_idx in &chunk.children {
      self.flatten_chunk(child_idx, declared_name.clone());
    }
  }

  fn collect_entry_point(&mut self, chunk_idx: ChunkIdx) {
    let graph = self.graph;
    let Some(&module_idx) = graph.chunks[chunk_idx].modules.first() else { return };
    if let Some(path) = &graph.modules[module_idx].path {
      self.entry_points.push(sanitize_source_path(path));
    }
  }

  /// Sanitization can fold two distinct request paths together; the second
  /// occurrence gets a disambiguating suffix instead of shadowing the
  /// first.
  fn push_record(&mut self, mut record: SourceRecord) {
    if self.emitted_paths.contains(record.path.as_str()) {
      record.path = format!("{}{}", record.path, self.allocator.allocate("dup"));
    }
    self.emitted_paths.insert(record.path.clone());
    self.sources.push(record);
  }
}

#[cfg(test)]
use optipack_common::{Chunk, ChunkKind, CompilerOptions, Module};

#[cfg(test)]
fn test_options() -> NormalizedCompilerOptions {
  crate::utils::normalize_options::normalize_options(CompilerOptions::default())
}

/// Two entry chunks with one module each, no nesting.
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

/// An entry chunk with a nested child and grandchild, plus assorted edge
/// cases: a pathless module, a sourceless module and an empty chunk.
#[cfg(test)]
fn nested_graph() -> ChunkGraph {
  let mut graph = ChunkGraph::default();
  let root = graph.add_chunk(Chunk::new(0, None, ChunkKind::EntryPoint, vec!["app.js".to_string()]));
  graph.add_module(root, Module::new(Some("src/index.js".into()), Some("entry();".into())));
  graph.add_module(root, Module::new(None, Some("generated();".into())));

  let child = graph.add_chunk(Chunk::new(1, None, ChunkKind::Common, vec!["1.app.js".to_string()]));
  graph.add_module(child, Module::new(Some("src/lazy.js".into()), None));

  let grandchild =
    graph.add_chunk(Chunk::new(2, None, ChunkKind::Common, vec!["2.app.js".to_string()]));
  graph.add_module(grandchild, Module::new(Some("src/deep.js".into()), Some("deep();".into())));

  let empty = graph.add_chunk(Chunk::new(3, None, ChunkKind::Common, vec!["3.app.js".to_string()]));

  graph.chunks[child].children.push(grandchild);
  graph.chunks[root].children.push(child);
  graph.chunks[root].children.push(empty);
  graph.root_chunks = vec![root];
  graph
}

#[test]
fn test_two_entry_chunks_flatten_to_three_declarations() {
  let graph = two_entry_graph();
  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  assert_eq!(output.sources.len(), 3);
  assert_eq!(
    output.module_declarations,
    vec![
      ModuleDeclaration::new(BASE_MODULE_NAME.to_string(), 1, None),
      ModuleDeclaration::new("chunk-1".to_string(), 1, Some(BASE_MODULE_NAME.to_string())),
      ModuleDeclaration::new("chunk-2".to_string(), 1, Some(BASE_MODULE_NAME.to_string())),
    ]
  );
  assert_eq!(output.entry_points, vec!["src/a.js", "src/b.js"]);
}

#[test]
fn test_source_counts_sum_to_the_source_sequence_length() {
  for graph in [two_entry_graph(), nested_graph()] {
    let options = test_options();
    let output = FlattenStage::new(&graph, &options).flatten();
    let declared: usize =
      output.module_declarations.iter().map(|declaration| declaration.source_count).sum();
    assert_eq!(declared, output.sources.len());
    assert!(output.module_declarations.iter().all(|declaration| declaration.source_count > 0));
  }
}

#[test]
fn test_declarations_are_topologically_ordered() {
  let graph = nested_graph();
  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  for (index, declaration) in output.module_declarations.iter().enumerate() {
    if let Some(parent) = &declaration.parent_name {
      let parent_position = output
        .module_declarations
        .iter()
        .position(|candidate| &candidate.name == parent)
        .expect("parent is declared");
      assert!(parent_position < index, "{} declared before its parent", declaration.name);
    }
  }
}

#[test]
fn test_flattening_is_idempotent_with_a_fresh_allocator() {
  let graph = nested_graph();
  let options = test_options();
  let first = FlattenStage::new(&graph, &options).flatten();
  let second = FlattenStage::new(&graph, &options).flatten();

  assert_eq!(first.sources, second.sources);
  assert_eq!(first.module_declarations, second.module_declarations);
  assert_eq!(first.entry_points, second.entry_points);
}

#[test]
fn test_empty_chunk_gets_a_placeholder_record() {
  let graph = nested_graph();
  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  let empty_declaration = output
    .module_declarations
    .iter()
    .find(|declaration| declaration.name == "chunk-3")
    .expect("empty chunk is declared");
  assert_eq!(empty_declaration.source_count, 1);

  let placeholder = output.sources.last().expect("placeholder is the final record");
  assert!(placeholder.path.starts_with("__empty_"));
  assert!(placeholder.content.is_empty());
}

#[test]
fn test_sourceless_module_degrades_to_an_empty_record() {
  let graph = nested_graph();
  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  let record = output
    .sources
    .iter()
    .find(|record| record.path == "src/lazy.js")
    .expect("sourceless module still occupies its slot");
  assert!(record.content.is_empty());
}

#[test]
fn test_ignored_modules_are_dropped_and_the_count_shrinks() {
  let mut graph = ChunkGraph::default();
  let chunk =
    graph.add_chunk(Chunk::new(1, None, ChunkKind::EntryPoint, vec!["main.js".to_string()]));
  graph.add_module(chunk, Module::new(Some("src/a.js".into()), Some("var a;".into())));
  graph.add_module(
    chunk,
    Module::new(Some("__ignored__".into()), Some("/* (ignored) */".into())),
  );
  graph.root_chunks = vec![chunk];

  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  assert_eq!(output.module_declarations[1].source_count, 1);
  assert!(output.sources.iter().all(|record| record.path != "__ignored__"));
}

#[test]
fn test_colliding_sanitized_paths_are_disambiguated() {
  let mut graph = ChunkGraph::default();
  let chunk =
    graph.add_chunk(Chunk::new(1, None, ChunkKind::EntryPoint, vec!["main.js".to_string()]));
  graph.add_module(chunk, Module::new(Some("src/a b.js".into()), Some("first();".into())));
  graph.add_module(chunk, Module::new(Some("src/a?b.js".into()), Some("second();".into())));
  graph.root_chunks = vec![chunk];

  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  let paths: Vec<&str> =
    output.sources.iter().map(|record| record.path.as_str()).collect();
  assert_eq!(paths.len(), 3);
  assert_eq!(paths[1], "src/a_b.js");
  assert!(paths[2].starts_with("src/a_b.js__dup_"));
  assert_ne!(paths[1], paths[2]);
}

#[test]
fn test_amd_modules_are_rendered_before_emission() {
  let mut graph = ChunkGraph::default();
  let chunk =
    graph.add_chunk(Chunk::new(1, None, ChunkKind::EntryPoint, vec!["main.js".to_string()]));
  graph.add_module(
    chunk,
    Module::new(Some("vendor/lib.js".into()), Some("var __AMD_DEFINE_RESULT__ = f();".into()))
      .with_dependency_kind(optipack_common::DependencyKind::AmdDefine),
  );
  graph.root_chunks = vec![chunk];

  let options = test_options();
  let output = FlattenStage::new(&graph, &options).flatten();

  assert_eq!(
    output.sources[1].content,
    "var /** @suppress {duplicate} */ __AMD_DEFINE_RESULT__ = f();"
  );
}

#[test]
fn test_runtime_preamble_backs_the_synthetic_root() {
  let graph = two_entry_graph();
  let raw = CompilerOptions {
    runtime_preamble: Some("// bootstrap".to_string()),
    ..CompilerOptions::default()
  };
  let options = crate::utils::normalize_options::normalize_options(raw);
  let output = FlattenStage::new(&graph, &options).flatten();

  assert_eq!(output.sources[0].path, BASE_SOURCE_PATH);
  assert_eq!(output.sources[0].content, "// bootstrap");
}
