//! One-way bridge to the hosting shell process
//!
//! Preference toggles are forwarded to the desktop shell as fire-and-forget
//! messages; no acknowledgment is awaited and delivery failures are only
//! logged.

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

pub const ALWAYS_ON_TOP_CHANNEL: &str = "swap-always-on-top";

/// Outbound message envelope, one JSON line per message.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ShellMessage {
    pub channel: &'static str,
    pub payload: bool,
}

/// Capability to send one-way messages to the hosting shell.
pub trait ShellBridge: Send + Sync {
    fn send_always_on_top(&self, value: bool);
}

/// Bridge writing JSON lines to stdout for the shell process to consume.
pub struct StdoutShellBridge {
    tx: mpsc::UnboundedSender<ShellMessage>,
}

impl StdoutShellBridge {
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ShellMessage>();
        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(message) = rx.recv().await {
                let Ok(mut line) = serde_json::to_vec(&message) else {
                    continue;
                };
                line.push(b'\n');
                if let Err(e) = stdout.write_all(&line).await {
                    tracing::debug!(error = %e, "Shell message not delivered");
                }
                let _ = stdout.flush().await;
            }
        });
        Self { tx }
    }
}

impl ShellBridge for StdoutShellBridge {
    fn send_always_on_top(&self, value: bool) {
        let message = ShellMessage {
            channel: ALWAYS_ON_TOP_CHANNEL,
            payload: value,
        };
        if self.tx.send(message).is_err() {
            tracing::debug!("Shell bridge receiver is gone");
        }
    }
}
