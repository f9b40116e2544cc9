use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarningLevel {
  Quiet,
  Default,
  #[default]
  Verbose,
}

impl WarningLevel {
  pub fn flag_value(self) -> &'static str {
    match self {
      Self::Quiet => "QUIET",
      Self::Default => "DEFAULT",
      Self::Verbose => "VERBOSE",
    }
  }
}

impl FromStr for WarningLevel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "quiet" => Ok(Self::Quiet),
      "default" => Ok(Self::Default),
      "verbose" => Ok(Self::Verbose),
      _ => Err(format!("Invalid warning level \"{s}\".")),
    }
  }
}
