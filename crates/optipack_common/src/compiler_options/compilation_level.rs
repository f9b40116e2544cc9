use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompilationLevel {
  WhitespaceOnly,
  #[default]
  Simple,
  Advanced,
}

impl CompilationLevel {
  pub fn flag_value(self) -> &'static str {
    match self {
      Self::WhitespaceOnly => "WHITESPACE_ONLY",
      Self::Simple => "SIMPLE",
      Self::Advanced => "ADVANCED",
    }
  }
}

impl FromStr for CompilationLevel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "whitespace-only" => Ok(Self::WhitespaceOnly),
      "simple" => Ok(Self::Simple),
      "advanced" => Ok(Self::Advanced),
      _ => Err(format!("Invalid compilation level \"{s}\".")),
    }
  }
}
