/// Name of the synthetic root module every top-level chunk depends on.
pub const BASE_MODULE_NAME: &str = "required-base";
/// Path of the single source record backing the synthetic root.
pub const BASE_SOURCE_PATH: &str = "__base_module__.js";

/// Declares one named unit of the external compiler's module system,
/// consuming the next `source_count` records of the flattened source
/// sequence. Declarations are ordered so every parent precedes its
/// dependents, and `source_count` is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeclaration {
  pub name: String,
  pub source_count: usize,
  pub parent_name: Option<String>,
}

impl ModuleDeclaration {
  pub fn new(name: String, source_count: usize, parent_name: Option<String>) -> Self {
    Self { name, source_count, parent_name }
  }

  /// `name:count[:parent]`, the spelling of the compiler's `--module` flag.
  pub fn flag_value(&self) -> String {
    match &self.parent_name {
      Some(parent) => format!("{}:{}:{parent}", self.name, self.source_count),
      None => format!("{}:{}", self.name, self.source_count),
    }
  }
}

#[test]
fn test_flag_value() {
  let root = ModuleDeclaration::new(BASE_MODULE_NAME.to_string(), 1, None);
  assert_eq!(root.flag_value(), "required-base:1");

  let chunk =
    ModuleDeclaration::new("chunk-4".to_string(), 3, Some(BASE_MODULE_NAME.to_string()));
  assert_eq!(chunk.flag_value(), "chunk-4:3:required-base");
}
