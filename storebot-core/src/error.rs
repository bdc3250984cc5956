use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    /// The conversation state record could not be loaded, created or found on the turn.
    #[error("State unavailable for conversation {0}")]
    StateUnavailable(String),

    #[error("Invalid activity: {0}")]
    InvalidActivity(String),
}

/// Failures raised by the dialogue engine's lifecycle hooks.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session-start hook failed; the engine must not establish the session.
    #[error("Session start failed: {0}")]
    StartFailure(String),

    /// The session-end hook failed partway; logged by the engine, never retried.
    #[error("Session end failed: {0}")]
    EndFailure(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
