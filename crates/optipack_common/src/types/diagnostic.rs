use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
  Warning,
  Error,
}

/// One structured warning or error extracted from the external compiler's
/// stderr text. Lives for a single pass; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
  pub severity: DiagnosticSeverity,
  pub file: Option<String>,
  pub line: Option<u32>,
  /// Pre-bundling location, present when the compiler annotated the
  /// diagnostic with an "Originally at:" cross-reference.
  pub original_file: Option<String>,
  pub original_line: Option<u32>,
  pub message: String,
  pub context: Option<String>,
}

impl DiagnosticRecord {
  /// Fallback record for text the parser could not give any structure.
  pub fn bare_error(message: impl Into<String>) -> Self {
    Self {
      severity: DiagnosticSeverity::Error,
      file: None,
      line: None,
      original_file: None,
      original_line: None,
      message: message.into(),
      context: None,
    }
  }
}

impl fmt::Display for DiagnosticRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let (Some(file), Some(line)) = (&self.file, self.line) {
      write!(f, "{file}:{line}: ")?;
    }
    write!(f, "{}", self.message)?;
    if let (Some(original_file), Some(original_line)) = (&self.original_file, self.original_line) {
      write!(f, " (originally at {original_file}:{original_line})")?;
    }
    if let Some(context) = &self.context {
      write!(f, "\n{context}")?;
    }
    Ok(())
  }
}

#[test]
fn test_display_includes_attribution_and_context() {
  let record = DiagnosticRecord {
    severity: DiagnosticSeverity::Warning,
    file: Some("/a/b.js".to_string()),
    line: Some(10),
    original_file: Some("src/b.js".to_string()),
    original_line: Some(3),
    message: "unused variable".to_string(),
    context: Some("var x = 1;".to_string()),
  };
  assert_eq!(
    record.to_string(),
    "/a/b.js:10: unused variable (originally at src/b.js:3)\nvar x = 1;"
  );

  let bare = DiagnosticRecord::bare_error("boom");
  assert_eq!(bare.to_string(), "boom");
}
