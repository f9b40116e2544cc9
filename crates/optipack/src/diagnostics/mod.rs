pub mod report;

use std::sync::LazyLock;

use optipack_common::{DiagnosticRecord, DiagnosticSeverity};
use regex::Regex;

/// `<file>:<line>: <rest>` — the attribution header of a regular
/// diagnostic paragraph.
static FILE_LINE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(.+):(\d+):\s*(.*)$").unwrap());

/// `<N> error(s), ...` — the trailing summary paragraph.
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+ error\(s\),").unwrap());

/// `<TYPE> - <message>` — the severity token leading a message.
static SEVERITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z_]+) - (.*)$").unwrap());

const INTERNAL_ERROR_MARKER: &str = "INTERNAL COMPILER ERROR";
const ORIGINALLY_AT: &str = "Originally at:";

/// Parses the external compiler's stderr text into structured records.
///
/// The text is a sequence of paragraphs separated by blank lines; a summary
/// paragraph terminates parsing and everything after it is ignored. Never
/// fails: paragraphs the grammar cannot place degrade to bare ERROR records
/// carrying the raw text.
pub fn parse_diagnostics(raw: &str) -> Vec<DiagnosticRecord> {
  let paragraphs = split_paragraphs(raw);
  let mut records = Vec::new();

  let mut index = 0;
  while index < paragraphs.len() {
    let paragraph = &paragraphs[index];
    if SUMMARY_RE.is_match(paragraph[0]) {
      break;
    }

    let mut record = if paragraph[0].contains(INTERNAL_ERROR_MARKER) {
      DiagnosticRecord::bare_error(paragraph.join("\n"))
    } else {
      parse_paragraph(paragraph)
    };

    // A following paragraph with no attribution header of its own belongs
    // to this record's context (e.g. a multi-paragraph type trace).
    while let Some(next) = paragraphs.get(index + 1) {
      if FILE_LINE_RE.is_match(next[0])
        || next[0].contains(INTERNAL_ERROR_MARKER)
        || SUMMARY_RE.is_match(next[0])
      {
        break;
      }
      let continuation = next.join("\n");
      record.context = Some(match record.context.take() {
        Some(context) => format!("{context}\n\n{continuation}"),
        None => continuation,
      });
      index += 1;
    }

    records.push(record);
    index += 1;
  }

  records
}

fn split_paragraphs(raw: &str) -> Vec<Vec<&str>> {
  let mut paragraphs = Vec::new();
  let mut current = Vec::new();
  for line in raw.lines() {
    if line.trim().is_empty() {
      if !current.is_empty() {
        paragraphs.push(std::mem::take(&mut current));
      }
    } else {
      current.push(line);
    }
  }
  if !current.is_empty() {
    paragraphs.push(current);
  }
  paragraphs
}

fn parse_paragraph(lines: &[&str]) -> DiagnosticRecord {
  let mut file = None;
  let mut line = None;
  let mut original_file = None;
  let mut original_line = None;
  let mut consumed = 1;
  let mut rest = lines[0];

  if let Some(captures) = FILE_LINE_RE.captures(lines[0]) {
    file = Some(captures[1].to_string());
    line = captures[2].parse().ok();
    rest = captures.get(3).map_or("", |matched| matched.as_str());

    // The cross-reference is positional: the second line announces it, the
    // third carries the pre-bundling location and the displayed message.
    if lines.get(1).is_some_and(|second| second.trim() == ORIGINALLY_AT) {
      if let Some(original_captures) = lines.get(2).and_then(|third| FILE_LINE_RE.captures(third))
      {
        original_file = Some(original_captures[1].to_string());
        original_line = original_captures[2].parse().ok();
        rest = original_captures.get(3).map_or("", |matched| matched.as_str());
        consumed = 3;
      }
    }
  }

  let (severity, message) = match SEVERITY_RE.captures(rest) {
    Some(captures) => {
      let severity = if &captures[1] == "WARNING" {
        DiagnosticSeverity::Warning
      } else {
        DiagnosticSeverity::Error
      };
      (severity, captures[2].to_string())
    }
    None => (DiagnosticSeverity::Error, rest.to_string()),
  };

  let context_lines = &lines[consumed..];
  let context = (!context_lines.is_empty()).then(|| context_lines.join("\n"));

  DiagnosticRecord { severity, file, line, original_file, original_line, message, context }
}

#[test]
fn test_attributed_warning_with_context() {
  let records = parse_diagnostics("/a/b.js:10: WARNING - oops\ncontext line");
  assert_eq!(records.len(), 1);
  let record = &records[0];
  assert_eq!(record.severity, DiagnosticSeverity::Warning);
  assert_eq!(record.file.as_deref(), Some("/a/b.js"));
  assert_eq!(record.line, Some(10));
  assert_eq!(record.message, "oops");
  assert_eq!(record.context.as_deref(), Some("context line"));
  assert_eq!(record.original_file, None);
}

#[test]
fn test_unattributed_line_is_a_bare_error() {
  let records = parse_diagnostics("something went sideways");
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].severity, DiagnosticSeverity::Error);
  assert_eq!(records[0].message, "something went sideways");
  assert_eq!(records[0].file, None);
}

#[test]
fn test_unknown_severity_token_defaults_to_error() {
  let records = parse_diagnostics("/a/b.js:3: NOTICE - something");
  assert_eq!(records[0].severity, DiagnosticSeverity::Error);
  assert_eq!(records[0].message, "something");
}

#[test]
fn test_summary_paragraph_terminates_parsing() {
  let raw = "/a/b.js:1: ERROR - first\n\n5 error(s), 2 warning(s)\n\n/c/d.js:2: ERROR - after";
  let records = parse_diagnostics(raw);
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].message, "first");
}

#[test]
fn test_internal_compiler_error_paragraph_is_kept_verbatim() {
  let raw = "INTERNAL COMPILER ERROR: stack overflow\nat OptimizeLoop.run";
  let records = parse_diagnostics(raw);
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].severity, DiagnosticSeverity::Error);
  assert_eq!(records[0].message, "INTERNAL COMPILER ERROR: stack overflow\nat OptimizeLoop.run");
  assert_eq!(records[0].file, None);
}

#[test]
fn test_originally_at_populates_the_cross_reference() {
  let raw = "dist/chunk-1.js:4: WARNING - generated\nOriginally at:\nsrc/a.js:12: WARNING - unused variable x\nvar x;";
  let records = parse_diagnostics(raw);
  assert_eq!(records.len(), 1);
  let record = &records[0];
  assert_eq!(record.severity, DiagnosticSeverity::Warning);
  assert_eq!(record.file.as_deref(), Some("dist/chunk-1.js"));
  assert_eq!(record.line, Some(4));
  assert_eq!(record.original_file.as_deref(), Some("src/a.js"));
  assert_eq!(record.original_line, Some(12));
  // The displayed message comes from the cross-referenced line.
  assert_eq!(record.message, "unused variable x");
  assert_eq!(record.context.as_deref(), Some("var x;"));
}

#[test]
fn test_missing_originally_at_annotation_parses_as_a_plain_record() {
  let raw = "dist/chunk-1.js:4: ERROR - bad call\nfoo();\n    ^";
  let records = parse_diagnostics(raw);
  assert_eq!(records.len(), 1);
  let record = &records[0];
  assert_eq!(record.message, "bad call");
  assert_eq!(record.original_file, None);
  assert_eq!(record.context.as_deref(), Some("foo();\n    ^"));
}

#[test]
fn test_dangling_originally_at_degrades_to_context() {
  // The announcement is present but the third line never arrives; the
  // positional grammar falls back to a plain record.
  let raw = "dist/chunk-1.js:4: ERROR - bad call\nOriginally at:";
  let records = parse_diagnostics(raw);
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].message, "bad call");
  assert_eq!(records[0].original_file, None);
  assert_eq!(records[0].context.as_deref(), Some("Originally at:"));
}

#[test]
fn test_headerless_paragraph_is_absorbed_as_context() {
  let raw = "/a/b.js:1: ERROR - first\nline under\n\nsome free-floating explanation\nsecond line\n\n/c/d.js:2: ERROR - second";
  let records = parse_diagnostics(raw);
  assert_eq!(records.len(), 2);
  assert_eq!(
    records[0].context.as_deref(),
    Some("line under\n\nsome free-floating explanation\nsecond line")
  );
  assert_eq!(records[1].message, "second");
}

#[test]
fn test_empty_input_yields_no_records() {
  assert!(parse_diagnostics("").is_empty());
  assert!(parse_diagnostics("\n\n\n").is_empty());
}
