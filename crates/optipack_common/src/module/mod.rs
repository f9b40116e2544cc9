use arcstr::ArcStr;

/// One compilable source unit inside a chunk.
#[derive(Debug, Default)]
pub struct Module {
  /// Request path as the bundler recorded it. `None` for virtual or
  /// generated modules with no natural identity.
  pub path: Option<ArcStr>,
  /// `None` when the bundler could not provide the source text; the
  /// flattener substitutes an empty record rather than failing the pass.
  pub source: Option<ArcStr>,
  pub dependency_kind: DependencyKind,
}

impl Module {
  pub fn new(path: Option<ArcStr>, source: Option<ArcStr>) -> Self {
    Self { path, source, dependency_kind: DependencyKind::default() }
  }

  pub fn with_dependency_kind(mut self, dependency_kind: DependencyKind) -> Self {
    self.dependency_kind = dependency_kind;
    self
  }
}

/// Static tag keying the dependency-renderer lookup table. Resolved once
/// per pass; never patched at runtime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
  #[default]
  EsModule,
  CommonJs,
  AmdDefine,
}
