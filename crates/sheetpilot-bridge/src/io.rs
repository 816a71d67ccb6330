//! JSON-over-stdio request/response plumbing for the helper process

use std::io::{BufRead, BufReader, Write};
use std::process::{ChildStdin, ChildStdout};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use sheetpilot_protocol::{Command, Request, Response, ResponseData, ResponseResult};

/// Transport-level failures talking to the helper.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("failed to send command to helper: {0}")]
    Send(String),

    #[error("failed to read response from helper: {0}")]
    Read(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("helper process closed its end of the pipe")]
    Closed,

    #[error("helper returned error: {0}")]
    Remote(String),

    #[error("unexpected response data")]
    UnexpectedResponse,
}

/// One request/response channel to a running helper.
///
/// Requests are serialized onto the pipe one at a time; the helper answers in
/// order, so the response read under the same send is always the matching
/// one. The ID is still carried and checked for defect detection.
#[derive(Debug)]
pub struct HelperIo {
    stdin: Mutex<ChildStdin>,
    stdout: Mutex<BufReader<ChildStdout>>,
    next_id: AtomicU64,
}

impl HelperIo {
    pub fn new(stdin: ChildStdin, stdout: ChildStdout) -> Self {
        Self {
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(BufReader::new(stdout)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Send a command and wait for the helper's response.
    pub fn send(&self, command: Command) -> Result<Option<ResponseData>, IoError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request { id, command };
        let json = serde_json::to_string(&request)?;

        {
            let mut stdin = self.stdin.lock().unwrap();
            writeln!(stdin, "{json}").map_err(|e| IoError::Send(e.to_string()))?;
            stdin.flush().map_err(|e| IoError::Send(e.to_string()))?;
        }

        let response: Response = {
            let mut stdout = self.stdout.lock().unwrap();
            let mut line = String::new();
            stdout
                .read_line(&mut line)
                .map_err(|e| IoError::Read(e.to_string()))?;

            if line.is_empty() {
                return Err(IoError::Closed);
            }

            serde_json::from_str(&line)?
        };

        if response.id != id {
            return Err(IoError::Read(format!(
                "response id {} does not match request id {id}",
                response.id
            )));
        }

        match response.result {
            ResponseResult::Ok { data } => Ok(data),
            ResponseResult::Error { message } => Err(IoError::Remote(message)),
        }
    }
}
