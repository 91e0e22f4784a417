use crate::config::SandboxConfig;
use crate::error::SandboxError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

/// Maximum captured output size in bytes (1 MB).
const MAX_OUTPUT_BYTES: usize = 1_048_576;

/// Runs untrusted generated code inside an ephemeral container.
///
/// Isolation is mandatory, not optional: the container gets no network, a
/// memory and pid ceiling, and is force-removed after every run regardless
/// of outcome, so no instance outlives the call. Every failure mode
/// (runtime unavailable, non-zero exit, deadline hit) is rendered as
/// descriptive text; the dispatch loop consumes it like any other
/// observation.
///
/// The runtime binary comes from config so tests can substitute a stub for
/// `docker`.
pub struct SandboxExecutor {
    runtime: String,
    image: String,
    timeout_secs: u64,
    memory_limit: String,
}

impl SandboxExecutor {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            runtime: config.runtime.clone(),
            image: config.image.clone(),
            timeout_secs: config.timeout_secs,
            memory_limit: config.memory_limit.clone(),
        }
    }

    /// Execute `code` to completion (or until the deadline) and return the
    /// captured combined output.
    pub async fn execute(&self, code: &str) -> String {
        let container = container_name();

        let mut cmd = Command::new(&self.runtime);
        cmd.args(self.run_args(&container, code))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(container = %container, image = %self.image, "sandbox run");

        let result = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => render_output(&output),
            Ok(Err(e)) => SandboxError::RuntimeUnavailable(e.to_string()).to_string(),
            Err(_) => {
                // Deadline hit with the container still running; `--rm` only
                // cleans up on exit, so remove it explicitly.
                self.force_remove(&container).await;
                format!(
                    "{} and the container was removed",
                    SandboxError::Timeout(self.timeout_secs)
                )
            }
        };

        // `--rm` removes the container on normal completion; the extra
        // removal below is a no-op then, and the safety net when the
        // process was killed mid-run.
        self.force_remove(&container).await;
        output
    }

    fn run_args(&self, container: &str, code: &str) -> Vec<String> {
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container.to_string(),
            "--network".to_string(),
            "none".to_string(),
            "--memory".to_string(),
            self.memory_limit.clone(),
            "--pids-limit".to_string(),
            "128".to_string(),
            self.image.clone(),
            "python".to_string(),
            "-c".to_string(),
            code.to_string(),
        ]
    }

    async fn force_remove(&self, container: &str) {
        let result = Command::new(&self.runtime)
            .args(["rm", "-f", container])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        if let Err(e) = result {
            tracing::debug!(container = %container, error = %e, "container removal skipped");
        }
    }
}

fn container_name() -> String {
    format!("yada-sandbox-{}", Uuid::new_v4())
}

fn render_output(output: &std::process::Output) -> String {
    let mut stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let mut stderr = String::from_utf8_lossy(&output.stderr).to_string();
    truncate_at_boundary(&mut stdout);
    truncate_at_boundary(&mut stderr);

    if output.status.success() {
        if stderr.is_empty() {
            stdout
        } else {
            format!("{stdout}\n{stderr}")
        }
    } else {
        format!(
            "Sandbox exited with {}: {}",
            output.status,
            if stderr.is_empty() { &stdout } else { &stderr }
        )
    }
}

/// Truncate to `MAX_OUTPUT_BYTES` on a char boundary to prevent OOM on
/// runaway output.
fn truncate_at_boundary(text: &mut String) {
    if text.len() <= MAX_OUTPUT_BYTES {
        return;
    }
    let mut cut = MAX_OUTPUT_BYTES;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    text.push_str("\n... [output truncated at 1MB]");
}
