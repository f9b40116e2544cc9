use optipack_common::{DiagnosticRecord, DiagnosticSeverity};

use crate::types::pass_output::PassOutput;

/// Folds parsed diagnostics into the pass's own collections. Severity
/// mapping is exact: WARNING records become warnings, everything else
/// becomes an error; no record ever lands in both lists.
pub fn report_diagnostics(records: Vec<DiagnosticRecord>, output: &mut PassOutput) {
  for record in records {
    let severity = record.severity;
    let error = anyhow::anyhow!("{record}");
    match severity {
      DiagnosticSeverity::Warning => output.warnings.push(error),
      DiagnosticSeverity::Error => output.errors.push(error),
    }
  }
}

#[test]
fn test_each_record_lands_in_exactly_one_collection() {
  let mut output = PassOutput::default();
  let mut warning = DiagnosticRecord::bare_error("w");
  warning.severity = DiagnosticSeverity::Warning;
  report_diagnostics(vec![warning, DiagnosticRecord::bare_error("e")], &mut output);

  assert_eq!(output.warnings.len(), 1);
  assert_eq!(output.errors.len(), 1);
  assert_eq!(output.warnings[0].to_string(), "w");
  assert_eq!(output.errors[0].to_string(), "e");
}
