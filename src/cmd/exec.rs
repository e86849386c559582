/*!
`exec.rs`

Runs a rendered argument vector as a child process and captures its output.

Behavior:
  - argv[0] is the program, argv[1..] are passed verbatim (no shell, no globbing)
  - stdin is closed; stdout and stderr are piped and drained while waiting
  - output text = trim(stdout + "\n" + stderr)
  - exit code 0 => success; anything else is reported with the captured output

Outcome kinds:
  Success                 exit status 0
  Failed { code }         non-zero exit (code is None when killed by a signal)
  SpawnError { message }  the program could not be started
*/

use std::process::Stdio;

use tokio::process::Command;

/// How a command invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitKind {
    Success,
    Failed { code: Option<i32> },
    SpawnError { message: String },
}

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub kind: ExitKind,
    /// Combined, trimmed stdout + stderr.
    pub output: String,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.kind, ExitKind::Success)
    }

    /// Short description of a failure, `None` on success.
    pub fn failure_message(&self) -> Option<String> {
        match &self.kind {
            ExitKind::Success => None,
            ExitKind::Failed { code: Some(code) } => {
                Some(format!("command failed with exit code {code}"))
            }
            ExitKind::Failed { code: None } => Some("command terminated by signal".to_string()),
            ExitKind::SpawnError { message } => Some(message.clone()),
        }
    }

    /// Text reported back to the caller: the output, or the failure message
    /// when a failed command printed nothing.
    pub fn display_text(&self) -> String {
        match self.failure_message() {
            Some(message) if self.output.is_empty() => message,
            _ => self.output.clone(),
        }
    }

    fn spawn_error(message: String) -> Self {
        Self {
            kind: ExitKind::SpawnError { message },
            output: String::new(),
        }
    }
}

/// Join both streams the way the tool result reports them.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(stdout),
        String::from_utf8_lossy(stderr)
    );
    combined.trim().to_string()
}

/// Run `argv` to completion.
pub async fn run_command(argv: &[String]) -> CommandOutcome {
    let Some((program, args)) = argv.split_first() else {
        return CommandOutcome::spawn_error("no command to run".to_string());
    };

    tracing::debug!("executing command: {}", shell_words::join(argv));

    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await;

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("spawn error: {e}");
            return CommandOutcome::spawn_error(format!("failed to start '{program}': {e}"));
        }
    };

    let text = combine_output(&output.stdout, &output.stderr);
    let kind = if output.status.success() {
        ExitKind::Success
    } else {
        ExitKind::Failed {
            code: output.status.code(),
        }
    };

    match &kind {
        ExitKind::Failed { code } => {
            tracing::debug!("command completed with non-zero exit code: {code:?}")
        }
        _ => tracing::debug!("command completed successfully with exit code 0"),
    }
    tracing::debug!("final output length: {} chars", text.len());

    CommandOutcome { kind, output: text }
}

/* --------------------------------- Tests ---------------------------------- */
