// Error types for the directory API and the CRUD harness, built on thiserror.
use thiserror::Error;

pub mod response;
pub mod harness;

pub use harness::{HarnessError, HarnessResult};

#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    #[error("Name is required and must be a non-empty string")]
    InvalidName,

    #[error("Invalid hoursToAdd value")]
    InvalidHours,

    // Holds the id as requested, which may not even be numeric
    #[error("User not found")]
    UserNotFound(String),
}

pub type AppResult<T> = Result<T, AppError>;
