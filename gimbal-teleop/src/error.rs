use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid coords: x={x}, y={y} (must be 0-100)")]
    InvalidFocus { x: i32, y: i32 },

    #[error("failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
