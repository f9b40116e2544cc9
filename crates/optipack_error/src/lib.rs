use std::ops::{Deref, DerefMut};

/// Collection of everything that went wrong during one optimize pass.
/// Most stages surface several independent failures at once, so the carrier
/// is a list rather than a single error.
#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  pub fn single(error: anyhow::Error) -> Self {
    Self(vec![error])
  }

  pub fn into_vec(self) -> Vec<anyhow::Error> {
    self.0
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

/// Error recorded when the external compiler process could never be started.
/// Carries the fully-expanded command line so the failure can be reproduced
/// by hand.
pub fn launch_failure(command_line: &str, cause: &std::io::Error) -> anyhow::Error {
  anyhow::anyhow!("failed to launch the external compiler (`{command_line}`): {cause}")
}

#[test]
fn test_launch_failure_keeps_the_command_line() {
  let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
  let error = launch_failure("closure-compiler --json_streams=BOTH", &cause);
  let rendered = error.to_string();
  assert!(rendered.contains("closure-compiler --json_streams=BOTH"));
  assert!(rendered.contains("no such file"));
}
