use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use async_trait::async_trait;
use scribe_engine::assist::ServiceError;
use scribe_engine::{CompletionRequest, CompletionResponse, CompletionService};

/// Completion service backed by a local program.
///
/// The request body is written to the program's stdin and the response
/// body is read from its stdout, both as JSON. The program runs to completion
/// on the calling thread.
pub struct CommandService {
    program: String,
    args: Vec<String>,
}

impl CommandService {
    /// `command` is the program followed by its arguments
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait(?Send)]
impl CompletionService for CommandService {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ServiceError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ServiceError::Unreachable(format!("cannot run {}: {e}", self.program)))?;

        // The request is written while stdout is being drained
        let writer = child
            .stdin
            .take()
            .map(|mut stdin| thread::spawn(move || stdin.write_all(&body)));

        let output = child
            .wait_with_output()
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(ServiceError::Unreachable(e.to_string()));
                }
                Err(_) => {
                    return Err(ServiceError::Unreachable(
                        "request writer panicked".to_string(),
                    ));
                }
                _ => {}
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::Unreachable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}
