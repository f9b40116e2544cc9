mod diagnostics;
mod optimizer;
mod stages;
mod types;
mod utils;

pub use crate::{
  diagnostics::parse_diagnostics,
  optimizer::Optimizer,
  stages::invoke::{CompilerInvoker, CompilerOutcome},
  types::pass_output::PassOutput,
};
pub use optipack_common::*;
