use std::error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type for both mail transports.
/// Each variant carries enough context to be shown to the caller verbatim.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum Error {
    /// The provider cannot express this field (e.g., cc on PostageApp)
    UnsupportedField(String),
    FileRead { path: String, reason: String },
    /// Provider answered with anything other than 200
    Provider { status: u16, message: String },
    UrlParseError(String),
    RequestTimeout,
    RequestError(String),
    JsonParseError(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UnsupportedField(ref field) => {
                write!(f, "UnsupportedField: transport does not support {}", field)
            }
            Error::FileRead {
                ref path,
                ref reason,
            } => write!(f, "FileRead: {}: {}", path, reason),
            Error::Provider {
                status,
                ref message,
            } => write!(f, "Provider ({}): {}", status, message),
            Error::UrlParseError(ref msg) => write!(f, "UrlParseError: {}", msg),
            Error::RequestTimeout => f.write_str("RequestTimeout"),
            Error::RequestError(ref msg) => write!(f, "RequestError: {}", msg),
            Error::JsonParseError(ref msg) => write!(f, "JsonParseError: {}", msg),
            Error::Config(ref msg) => write!(f, "Config: {}", msg),
        }
    }
}

impl error::Error for Error {}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::UrlParseError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout
        } else {
            Self::RequestError(err.to_string())
        }
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::JsonParseError(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
