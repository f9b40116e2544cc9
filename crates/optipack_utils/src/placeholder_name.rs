/// Hands out `__<kind>_<n>__` placeholder names for modules that have no
/// usable request path and for structurally empty chunks. The counter is
/// scoped to one flattening pass and threaded through it explicitly, so
/// concurrent passes never observe each other's numbering.
#[derive(Debug, Default)]
pub struct NameAllocator {
  next: u32,
}

impl NameAllocator {
  pub fn allocate(&mut self, kind: &str) -> String {
    let name = format!("__{kind}_{next}__", next = self.next);
    self.next += 1;
    name
  }
}

#[test]
fn test_allocate_is_unique_within_a_pass() {
  let mut allocator = NameAllocator::default();
  assert_eq!(allocator.allocate("unknown"), "__unknown_0__");
  assert_eq!(allocator.allocate("empty"), "__empty_1__");
  assert_eq!(allocator.allocate("unknown"), "__unknown_2__");

  // A fresh pass starts over.
  let mut allocator = NameAllocator::default();
  assert_eq!(allocator.allocate("unknown"), "__unknown_0__");
}
