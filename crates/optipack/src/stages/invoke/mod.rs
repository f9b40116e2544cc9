use std::io;
use std::process::Stdio;

use optipack_common::CompilationRequest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Symbol the runtime preamble declares for the asset base URL; its value
/// is injected per pass through a generated `--define`.
pub const PUBLIC_PATH_DEFINE: &str = "OPTIPACK_PUBLIC_PATH";

/// Result of driving the external compiler once. `LaunchFailed` means the
/// process never ran (or never finished); everything else, including
/// non-zero exits, is an `Exited` for the caller to interpret.
#[derive(Debug)]
pub enum CompilerOutcome {
  Exited { exit_code: i32, stdout: String, stderr: String },
  LaunchFailed { command_line: String, cause: io::Error },
}

/// Launches one external compiler process per pass, feeds it the serialized
/// source sequence and drains both of its output streams concurrently until
/// it exits. No pooling, no reuse.
pub struct CompilerInvoker<'request> {
  request: &'request CompilationRequest,
}

impl<'request> CompilerInvoker<'request> {
  pub fn new(request: &'request CompilationRequest) -> Self {
    Self { request }
  }

  /// Flag set in increasing precedence: built-in defaults, caller
  /// configuration, then the per-pass values nothing may override.
  pub fn arguments(&self) -> Vec<String> {
    let options = &self.request.options;
    let mut args: Vec<String> = vec![
      // Sources arrive on stdin and outputs leave on stdout, both as JSON;
      // module resolution follows the bundler's lookup rules.
      "--json_streams=BOTH".to_string(),
      "--module_resolution=WEBPACK".to_string(),
      "--process_common_js_modules".to_string(),
      "--assume_function_wrapper".to_string(),
    ];

    args.push(format!("--language_in={}", options.language_in.flag_value()));
    args.push(format!("--language_out={}", options.language_out.flag_value()));
    args.push(format!("--compilation_level={}", options.compilation_level.flag_value()));
    args.push(format!("--warning_level={}", options.warning_level.flag_value()));
    for externs_file in &options.externs {
      args.push(format!("--externs={externs_file}"));
    }
    for define in &options.defines {
      args.push(format!("--define={define}"));
    }
    if let Some(prefix) = &options.rename_prefix_namespace {
      args.push(format!("--rename_prefix_namespace={prefix}"));
    }

    for declaration in &self.request.modules {
      args.push(format!("--module={}", declaration.flag_value()));
    }
    for entry_point in &self.request.entry_points {
      args.push(format!("--entry_point={entry_point}"));
    }
    // Wrap every real chunk in an IIFE so chunk-local variables stay off
    // the global object; the synthetic root stays bare.
    for declaration in
      self.request.modules.iter().filter(|declaration| declaration.parent_name.is_some())
    {
      args.push(format!("--module_wrapper={}:(function(){{%s}}).call(this);", declaration.name));
    }
    if let Some(public_path) = &options.public_path {
      args.push(format!("--define={PUBLIC_PATH_DEFINE}='{public_path}'"));
    }

    args
  }

  /// The fully-expanded command line, as attempted; carried on launch
  /// failures so they can be reproduced by hand.
  pub fn command_line(&self) -> String {
    let mut pieces = self.request.options.compiler_command.clone();
    pieces.extend(self.arguments());
    pieces.join(" ")
  }

  pub async fn invoke(&self) -> CompilerOutcome {
    let options = &self.request.options;
    let command_line = self.command_line();

    // The payload is complete before anything is written: the request is
    // immutable and the compiler blocks reading until EOF.
    let payload = match serde_json::to_vec(&self.request.sources) {
      Ok(payload) => payload,
      Err(cause) => {
        return CompilerOutcome::LaunchFailed { command_line, cause: cause.into() };
      }
    };

    log::debug!("launching external compiler: {command_line}");

    let mut command = Command::new(options.program());
    command
      .args(options.leading_args())
      .args(self.arguments())
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    let mut child = match command.spawn() {
      Ok(child) => child,
      Err(cause) => return CompilerOutcome::LaunchFailed { command_line, cause },
    };

    let mut stdin = child.stdin.take().expect("stdin is piped");
    let mut child_stdout = child.stdout.take().expect("stdout is piped");
    let mut child_stderr = child.stderr.take().expect("stderr is piped");

    let run = async move {
      let feed_and_wait = async {
        // A compiler that dies before consuming its input surfaces as a
        // broken pipe here; the exit code and stderr still matter, so the
        // write error is not fatal.
        if let Err(error) = stdin.write_all(&payload).await {
          log::debug!("external compiler closed its input early: {error}");
        }
        drop(stdin);
        child.wait().await
      };

      let mut stdout_buf = Vec::new();
      let mut stderr_buf = Vec::new();
      // Both streams are drained while the process runs; reading them only
      // after exit would deadlock once a pipe buffer fills.
      let (status, stdout_read, stderr_read) = futures::join!(
        feed_and_wait,
        child_stdout.read_to_end(&mut stdout_buf),
        child_stderr.read_to_end(&mut stderr_buf),
      );
      if let Err(error) = stdout_read {
        log::warn!("failed to drain compiler stdout: {error}");
      }
      if let Err(error) = stderr_read {
        log::warn!("failed to drain compiler stderr: {error}");
      }
      (status, stdout_buf, stderr_buf)
    };

    let (status, stdout_buf, stderr_buf) = match options.process_timeout {
      Some(limit) => match tokio::time::timeout(limit, run).await {
        Ok(results) => results,
        Err(_) => {
          // Dropping the timed-out future reaps the child via kill_on_drop.
          let cause = io::Error::new(
            io::ErrorKind::TimedOut,
            format!("external compiler did not exit within {limit:?}"),
          );
          return CompilerOutcome::LaunchFailed { command_line, cause };
        }
      },
      None => run.await,
    };

    let status = match status {
      Ok(status) => status,
      Err(cause) => return CompilerOutcome::LaunchFailed { command_line, cause },
    };

    let stdout = String::from_utf8_lossy(&stdout_buf).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_buf).into_owned();
    // A signal-terminated child has no code; report it like a failure exit.
    let exit_code = status.code().unwrap_or(-1);
    log::debug!(
      "external compiler exited with status {exit_code} ({} bytes stdout, {} bytes stderr)",
      stdout.len(),
      stderr.len()
    );

    CompilerOutcome::Exited { exit_code, stdout, stderr }
  }
}

#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use optipack_common::{
  BASE_MODULE_NAME, CompilerOptions, ModuleDeclaration, SourceRecord,
};

#[cfg(test)]
fn test_request(command: &[&str]) -> CompilationRequest {
  let raw = CompilerOptions {
    compiler_command: Some(command.iter().map(ToString::to_string).collect()),
    public_path: Some("/static/".to_string()),
    ..CompilerOptions::default()
  };
  CompilationRequest {
    sources: vec![
      SourceRecord::new("__base_module__.js".to_string(), String::new()),
      SourceRecord::new("src/a.js".to_string(), "var a = 1;".to_string()),
      SourceRecord::new("src/b.js".to_string(), "var b = 2;".to_string()),
    ],
    modules: vec![
      ModuleDeclaration::new(BASE_MODULE_NAME.to_string(), 1, None),
      ModuleDeclaration::new("chunk-1".to_string(), 1, Some(BASE_MODULE_NAME.to_string())),
      ModuleDeclaration::new("chunk-2".to_string(), 1, Some(BASE_MODULE_NAME.to_string())),
    ],
    entry_points: vec!["src/a.js".to_string(), "src/b.js".to_string()],
    options: Arc::new(crate::utils::normalize_options::normalize_options(raw)),
  }
}

#[test]
fn test_forced_arguments_come_after_caller_configuration() {
  let request = test_request(&["compiler"]);
  let args = CompilerInvoker::new(&request).arguments();

  assert_eq!(args[0], "--json_streams=BOTH");
  let warning_level = args.iter().position(|arg| arg.starts_with("--warning_level=")).unwrap();
  let first_module = args.iter().position(|arg| arg.starts_with("--module=")).unwrap();
  assert!(warning_level < first_module);

  assert!(args.contains(&"--module=required-base:1".to_string()));
  assert!(args.contains(&"--module=chunk-1:1:required-base".to_string()));
  assert!(args.contains(&"--entry_point=src/a.js".to_string()));
  assert!(args.contains(&format!("--define={PUBLIC_PATH_DEFINE}='/static/'")));

  // The synthetic root gets no wrapper; every real chunk does.
  let wrappers: Vec<&String> =
    args.iter().filter(|arg| arg.starts_with("--module_wrapper=")).collect();
  assert_eq!(wrappers.len(), 2);
  assert!(wrappers.iter().all(|wrapper| !wrapper.contains(BASE_MODULE_NAME)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_invoke_feeds_stdin_and_collects_stdout() {
  // `cat` echoes the request back, standing in for an identity compiler.
  let request = test_request(&["sh", "-c", "cat"]);
  match CompilerInvoker::new(&request).invoke().await {
    CompilerOutcome::Exited { exit_code, stdout, stderr } => {
      assert_eq!(exit_code, 0);
      assert!(stderr.is_empty());
      let echoed: Vec<SourceRecord> = serde_json::from_str(&stdout).unwrap();
      assert_eq!(echoed, request.sources);
    }
    CompilerOutcome::LaunchFailed { command_line, cause } => {
      panic!("launch failed for `{command_line}`: {cause}")
    }
  }
}

#[cfg(unix)]
#[tokio::test]
async fn test_invoke_surfaces_nonzero_exit_and_stderr() {
  let request =
    test_request(&["sh", "-c", "cat >/dev/null; echo 'a.js:1: ERROR - boom' >&2; exit 7"]);
  match CompilerInvoker::new(&request).invoke().await {
    CompilerOutcome::Exited { exit_code, stdout, stderr } => {
      assert_eq!(exit_code, 7);
      assert!(stdout.is_empty());
      assert!(stderr.contains("a.js:1: ERROR - boom"));
    }
    CompilerOutcome::LaunchFailed { .. } => panic!("process should have started"),
  }
}

#[tokio::test]
async fn test_invoke_with_a_missing_executable_is_a_launch_failure() {
  let request = test_request(&["/definitely/not/a/compiler"]);
  match CompilerInvoker::new(&request).invoke().await {
    CompilerOutcome::LaunchFailed { command_line, .. } => {
      assert!(command_line.starts_with("/definitely/not/a/compiler"));
      assert!(command_line.contains("--json_streams=BOTH"));
    }
    CompilerOutcome::Exited { .. } => panic!("spawn should have failed"),
  }
}

#[cfg(unix)]
#[tokio::test]
async fn test_invoke_enforces_the_process_timeout() {
  let raw = CompilerOptions {
    compiler_command: Some(vec!["sh".to_string(), "-c".to_string(), "sleep 5".to_string()]),
    process_timeout: Some(std::time::Duration::from_millis(100)),
    ..CompilerOptions::default()
  };
  let request = CompilationRequest {
    sources: vec![],
    modules: vec![],
    entry_points: vec![],
    options: Arc::new(crate::utils::normalize_options::normalize_options(raw)),
  };
  match CompilerInvoker::new(&request).invoke().await {
    CompilerOutcome::LaunchFailed { cause, .. } => {
      assert_eq!(cause.kind(), io::ErrorKind::TimedOut);
    }
    CompilerOutcome::Exited { .. } => panic!("the sleep should have been cut short"),
  }
}
