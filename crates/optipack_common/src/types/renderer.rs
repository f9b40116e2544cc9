use std::borrow::Cow;

use rustc_hash::FxHashMap;

use crate::DependencyKind;

/// Rewrites a module's source text for one dependency flavor before it is
/// fed to the external compiler. Implementations register themselves in a
/// [`RendererTable`] under their static [`DependencyKind`] tag; the table is
/// built once per pass and looked up instead of swapping renderer objects at
/// runtime.
pub trait DependencyRenderer {
  fn kind(&self) -> DependencyKind;

  fn render<'s>(&self, source: &'s str) -> Cow<'s, str>;
}

#[derive(Default)]
pub struct RendererTable {
  renderers: FxHashMap<DependencyKind, Box<dyn DependencyRenderer + Send + Sync>>,
}

impl RendererTable {
  pub fn register(&mut self, renderer: Box<dyn DependencyRenderer + Send + Sync>) {
    self.renderers.insert(renderer.kind(), renderer);
  }

  /// Kinds without a registered renderer pass their source through
  /// untouched.
  pub fn render<'s>(&self, kind: DependencyKind, source: &'s str) -> Cow<'s, str> {
    match self.renderers.get(&kind) {
      Some(renderer) => renderer.render(source),
      None => Cow::Borrowed(source),
    }
  }
}

#[test]
fn test_unregistered_kinds_pass_through() {
  let table = RendererTable::default();
  let source = "var a = 1;";
  assert!(matches!(table.render(DependencyKind::EsModule, source), Cow::Borrowed(_)));
}
