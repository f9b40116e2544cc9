use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LanguageTarget {
  Es3,
  Es5,
  Es5Strict,
  Es2015,
  Es2016,
  Es2017,
  Es2018,
  Es2019,
  Es2020,
  #[default]
  EsNext,
}

impl LanguageTarget {
  /// Spelling the external compiler expects on its `--language_in` /
  /// `--language_out` flags.
  pub fn flag_value(self) -> &'static str {
    match self {
      Self::Es3 => "ECMASCRIPT3",
      Self::Es5 => "ECMASCRIPT5",
      Self::Es5Strict => "ECMASCRIPT5_STRICT",
      Self::Es2015 => "ECMASCRIPT_2015",
      Self::Es2016 => "ECMASCRIPT_2016",
      Self::Es2017 => "ECMASCRIPT_2017",
      Self::Es2018 => "ECMASCRIPT_2018",
      Self::Es2019 => "ECMASCRIPT_2019",
      Self::Es2020 => "ECMASCRIPT_2020",
      Self::EsNext => "ECMASCRIPT_NEXT",
    }
  }
}

impl FromStr for LanguageTarget {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "es3" => Ok(Self::Es3),
      "es5" => Ok(Self::Es5),
      "es5-strict" => Ok(Self::Es5Strict),
      "es2015" => Ok(Self::Es2015),
      "es2016" => Ok(Self::Es2016),
      "es2017" => Ok(Self::Es2017),
      "es2018" => Ok(Self::Es2018),
      "es2019" => Ok(Self::Es2019),
      "es2020" => Ok(Self::Es2020),
      "esnext" => Ok(Self::EsNext),
      _ => Err(format!("Invalid language target \"{s}\".")),
    }
  }
}
