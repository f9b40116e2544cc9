/// Maps an arbitrary module request path into the token alphabet the
/// external compiler accepts for source paths: `[A-Za-z0-9_$/.-]`.
/// Every other character becomes `_`. Total and idempotent.
pub fn sanitize_source_path(str: &str) -> String {
  let mut sanitized = String::with_capacity(str.len());
  for char in str.chars() {
    if char.is_ascii_alphanumeric() || matches!(char, '_' | '$' | '/' | '.' | '-') {
      sanitized.push(char);
    } else {
      sanitized.push('_');
    }
  }
  sanitized
}

#[test]
fn test_sanitize_source_path() {
  assert_eq!(sanitize_source_path("src/a b.js"), "src/a_b.js");
  assert_eq!(sanitize_source_path("pkg?query=1!loader"), "pkg_query_1_loader");
  assert_eq!(sanitize_source_path(" [synthetic:entry]"), "__synthetic_entry_");
}

#[test]
fn test_sanitize_source_path_is_idempotent() {
  for raw in ["née?.mjs", "a\\b\\c.js", "plain/path.js", ""] {
    let once = sanitize_source_path(raw);
    assert_eq!(sanitize_source_path(&once), once);
  }
}
