/// Outcome of one optimize pass. A failed pass (launch failure or non-zero
/// compiler exit) replaces nothing and reports why through `errors`; a
/// successful pass may still carry warnings and error-severity diagnostics
/// the compiler chose not to fail on.
#[derive(Debug, Default)]
pub struct PassOutput {
  /// Asset keys the pass overwrote, in replacement order.
  pub replaced: Vec<String>,
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
}
