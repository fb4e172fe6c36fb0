use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Backend {0} has no endpoint configured")]
    BackendUnresolved(String),

    #[error("A test run is already in progress")]
    AlreadyRunning,

    #[error("Invalid test case {name}: {reason}")]
    InvalidTestCase { name: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
