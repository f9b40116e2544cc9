use crate::source::Source;

/// Concatenates sources with a single `\n` between them. Prepended sources
/// (the shared runtime preamble) always land before appended ones, in the
/// order they were prepended.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  sources: Vec<Box<dyn Source + Send + 'source>>,
  prepended: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.sources.push(Box::new(source));
  }

  pub fn prepend_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.prepended.push(Box::new(source));
  }

  pub fn join(&self) -> String {
    let total = self.prepended.len() + self.sources.len();
    let size_hint = self
      .prepended
      .iter()
      .chain(self.sources.iter())
      .map(|source| source.content().len() + 1)
      .sum::<usize>()
      .saturating_sub(1);

    let mut joined = String::with_capacity(size_hint);
    for (index, source) in self.prepended.iter().chain(self.sources.iter()).enumerate() {
      joined.push_str(source.content());
      if index + 1 < total {
        joined.push('\n');
      }
    }
    joined
  }
}

#[test]
fn test_join_orders_prepended_sources_first() {
  let mut joiner = SourceJoiner::default();
  joiner.append_source("var a = 1;");
  joiner.prepend_source("// runtime");
  assert_eq!(joiner.join(), "// runtime\nvar a = 1;");
}

#[test]
fn test_join_of_nothing_is_empty() {
  let joiner = SourceJoiner::default();
  assert_eq!(joiner.join(), "");
}
