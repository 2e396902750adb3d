use reqwest::StatusCode;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unparseable timestamp {input:?}")]
pub struct TimestampError {
    pub input: String,
}

#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} returned {status}: {message}")]
    Rejected {
        endpoint: String,
        status: StatusCode,
        message: String,
    },
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Calendar(#[from] OutOfTimeError),
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type DiaryResult<T> = Result<T, DiaryError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config line {line}: {content}")]
    Syntax { line: usize, content: String },
    #[error("could not read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
