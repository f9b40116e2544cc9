use std::borrow::Cow;
use std::sync::LazyLock;

use optipack_common::{DependencyKind, DependencyRenderer, RendererTable};
use regex::Regex;

// Definition-result variables emitted for AMD-style defines are re-declared
// whenever several AMD modules land in one compilation unit; the compiler's
// duplicate-declaration check needs an explicit suppression on each.
static AMD_DEFINE_VAR_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^var (__\w*AMD\w*__)").unwrap());

struct AmdDefineRenderer;

impl DependencyRenderer for AmdDefineRenderer {
  fn kind(&self) -> DependencyKind {
    DependencyKind::AmdDefine
  }

  fn render<'s>(&self, source: &'s str) -> Cow<'s, str> {
    AMD_DEFINE_VAR_RE.replace_all(source, "var /** @suppress {duplicate} */ $1")
  }
}

/// Builds the per-pass renderer lookup table. ES and CommonJS sources need
/// no rewriting and fall through the table untouched.
pub fn renderer_table() -> RendererTable {
  let mut table = RendererTable::default();
  table.register(Box::new(AmdDefineRenderer));
  table
}

#[test]
fn test_amd_define_vars_get_a_duplicate_suppression() {
  let table = renderer_table();
  let source = "var __AMD_DEFINE_RESULT__ = factory();\nvar other = 1;";
  let rendered = table.render(DependencyKind::AmdDefine, source);
  assert_eq!(
    rendered,
    "var /** @suppress {duplicate} */ __AMD_DEFINE_RESULT__ = factory();\nvar other = 1;"
  );
}

#[test]
fn test_non_amd_sources_are_untouched() {
  let table = renderer_table();
  let source = "var __AMD_DEFINE_RESULT__ = 1;";
  assert_eq!(table.render(DependencyKind::CommonJs, source), source);
  assert_eq!(table.render(DependencyKind::EsModule, source), source);
}
