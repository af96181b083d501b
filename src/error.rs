// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error under '{key}': {message}")]
    Deserialization { key: String, message: String },
    #[error("Invalid record under '{key}': {message}")]
    Validation { key: String, message: String },
    #[error("Storage quota exceeded writing '{key}' ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Sign in first")]
    NotAuthenticated,
    #[error("Already signed in; log out to return to the login page")]
    AlreadyAuthenticated,
    #[error("Movie {0} is neither suggested nor saved")]
    UnknownMovie(i64),
    #[error("Rating {0} is out of range (0-5)")]
    RatingOutOfRange(u8),
    #[error("Pick at least one genre, mood or tone")]
    NoPreferences,
    #[error("Profile not updated: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
    #[error("CLI error: {0}")]
    Cli(String),
}

pub type AppResult<T> = Result<T, AppError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type SessionResult<T> = Result<T, SessionError>;
