pub mod client;
pub mod postageapp;
pub mod postmark;
mod backends;

use serde::{Deserialize, Serialize};

pub use backends::Backend;
pub use client::{HttpClient, HttpResponse, ReqwestClient};
pub use postageapp::PostageAppTransport;
pub use postmark::PostmarkTransport;

use crate::email::EmailMessage;
use crate::Error;

/// Outcome of a successful send.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    /// Exact payload handed to the provider
    pub message: serde_json::Value,
    /// Decoded provider response
    pub response: serde_json::Value,
}

/// Anything that can deliver an `EmailMessage`.
///
/// Each call builds its payload from scratch; implementations hold no
/// per-send state.
pub trait Transport {
    fn send(&self, email: &EmailMessage) -> Result<SendResult, Error>;
}

/// Map a provider response into its decoded JSON body, or into
/// `Error::Provider` if the status is not 200.
///
/// `message_pointer` is a JSON pointer to the provider's error message.
/// If it cannot be resolved the raw body is used instead.
pub(crate) fn map_status(resp: HttpResponse, message_pointer: &str) -> Result<serde_json::Value, Error> {
    if resp.status == 200 {
        return resp.json();
    }

    let message = resp
        .json()
        .ok()
        .and_then(|v| v.pointer(message_pointer).cloned())
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| String::from_utf8_lossy(&resp.body).into_owned());

    Err(Error::Provider {
        status: resp.status,
        message,
    })
}
