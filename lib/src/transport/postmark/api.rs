use reqwest::Url;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const POSTMARK_ENDPOINT: &str = "api.postmarkapp.com/email";
pub const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Token that makes Postmark accept and drop the message
pub const POSTMARK_TEST_TOKEN: &str = "POSTMARK_API_TEST";

/// Where the error text lives in a failed response
pub(crate) const ERROR_MESSAGE_POINTER: &str = "/Message";

/// Headers that are passed along in `Headers`, in this order
pub(crate) const EXTRA_HEADERS: &[&str] = &["X-Mailer", "MIME-Version", "Content-Transfer-Encoding"];

pub(crate) const TAG_HEADER: &str = "X-Tag";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attachment {
    pub name: String,
    /// Wrapped base64
    pub content: String,
    pub content_type: String,
}

/// Body of `POST /email`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[inline]
pub fn build_endpoint_url(secure: bool) -> Result<Url, Error> {
    let scheme = if secure { "https" } else { "http" };
    Url::parse(&format!("{}://{}", scheme, POSTMARK_ENDPOINT)).map_err(|e| e.into())
}
