//! Outbound path from the webview to the host.

use crossbeam_channel::{Sender, TrySendError};
use shared::protocol::HostCommand;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("host command queue is full")]
    QueueFull,
    #[error("host command channel disconnected")]
    Disconnected,
}

/// Sink for commands addressed to the host. Posting never blocks and never
/// waits for a reply.
pub trait HostChannel {
    fn post(&self, command: HostCommand) -> Result<(), PostError>;
}

impl HostChannel for Sender<HostCommand> {
    fn post(&self, command: HostCommand) -> Result<(), PostError> {
        self.try_send(command).map_err(|err| match err {
            TrySendError::Full(_) => PostError::QueueFull,
            TrySendError::Disconnected(_) => PostError::Disconnected,
        })
    }
}

/// Attempts delivery exactly once. Failures are logged and dropped; the host
/// owns recovery from lost commands.
pub fn dispatch_host_command<C: HostChannel + ?Sized>(channel: &C, command: HostCommand) {
    let command_name = command.name();
    match channel.post(command) {
        Ok(()) => tracing::debug!(command = command_name, "queued webview->host command"),
        Err(PostError::QueueFull) => {
            tracing::warn!(command = command_name, "host command queue is full; command dropped");
        }
        Err(PostError::Disconnected) => {
            tracing::warn!(
                command = command_name,
                "host command channel disconnected; command dropped"
            );
        }
    }
}
