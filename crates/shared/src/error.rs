use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown host command: {0}")]
    UnknownCommand(String),
}

impl ProtocolError {
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand(command.into())
    }
}
