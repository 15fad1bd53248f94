use std::collections::BTreeMap;

use reqwest::Url;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const POSTAGEAPP_ENDPOINT: &str = "https://api.postageapp.com/v.1.0/send_message.json";

pub(crate) const ERROR_MESSAGE_POINTER: &str = "/response/message";

/// Headers forwarded in `headers`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Headers {
    #[serde(rename = "From", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "Subject", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "Reply-To", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(rename = "X-Mailer", skip_serializing_if = "Option::is_none")]
    pub x_mailer: Option<String>,
    #[serde(rename = "MIME-Version", skip_serializing_if = "Option::is_none")]
    pub mime_version: Option<String>,
    #[serde(rename = "Content-Transfer-Encoding", skip_serializing_if = "Option::is_none")]
    pub content_transfer_encoding: Option<String>,
}

impl Headers {
    pub fn is_empty(&self) -> bool {
        *self == Headers::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "text/plain", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "text/html", skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Wrapped base64
    pub content: String,
    #[serde(rename = "Content_type")]
    pub content_type: String,
}

/// The `arguments` object of a send_message call
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<String>,
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    pub content: Content,
    /// Keyed by filename
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attachments: BTreeMap<String, Attachment>,
}

/// Full request body
#[derive(Clone, Debug, Serialize)]
pub struct Request<'a> {
    pub api_key: &'a str,
    pub uid: uuid::Uuid,
    pub arguments: &'a serde_json::Value,
}

#[inline]
pub fn build_endpoint_url() -> Result<Url, Error> {
    Url::parse(POSTAGEAPP_ENDPOINT).map_err(|e| e.into())
}
