/// Generic Email and Attachment implementations.
/// Transports read everything they need through `EmailMessage::header`,
/// `EmailMessage::body` and `EmailMessage::attachments`.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const DEFAULT_MIMETYPE: &str = "application/octet-stream";

/// Which body parts a message carries
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailFormat {
    Text,
    Html,
    Both,
}

impl Default for EmailFormat {
    fn default() -> Self {
        EmailFormat::Text
    }
}

impl EmailFormat {
    pub fn has_text(self) -> bool {
        self != EmailFormat::Html
    }

    pub fn has_html(self) -> bool {
        self != EmailFormat::Text
    }
}

impl FromStr for EmailFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "both" => Ok(Self::Both),
            _ => Err(Error::Config(format!("Unknown email format: {}", s))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub email: String,
    pub name: Option<String>,
}

impl Address {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: None,
        }
    }

    pub fn with_name(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: Some(name.to_string()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name {
            Some(ref name) if !name.is_empty() && name != &self.email => {
                write!(f, "{} <{}>", name, self.email)
            }
            _ => f.write_str(&self.email),
        }
    }
}

/// Parses `Name <email>` or a bare `email`
impl From<&str> for Address {
    fn from(s: &str) -> Self {
        let s = s.trim();

        match (s.rfind('<'), s.ends_with('>')) {
            (Some(start), true) => {
                let email = &s[start + 1..s.len() - 1];
                let name = s[..start].trim().trim_matches('"');

                if name.is_empty() {
                    Address::new(email)
                } else {
                    Address::with_name(email, name)
                }
            }
            _ => Address::new(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Name the recipient sees
    pub filename: String,

    /// Absolute path of the file on disk
    pub path: PathBuf,

    /// MIME type of the attachment (e.g., text/plain)
    pub mimetype: String,
}

impl Attachment {
    pub fn new(filename: &str, path: impl Into<PathBuf>, mimetype: &str) -> Self {
        Self {
            filename: filename.to_string(),
            path: path.into(),
            mimetype: mimetype.to_string(),
        }
    }

    /// Builds an attachment named after the file itself
    pub fn from_path(path: impl AsRef<Path>, mimetype: Option<&str>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(&filename, path, mimetype.unwrap_or(DEFAULT_MIMETYPE))
    }
}

/// A single outgoing email, as composed by the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: Vec<Address>,
    pub sender: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub return_path: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub subject: Option<String>,

    pub format: EmailFormat,
    pub text: Option<String>,
    pub html: Option<String>,

    pub attachments: Vec<Attachment>,

    /// Custom headers in insertion order
    pub headers: Vec<(String, String)>,
}

fn join_addresses(addresses: &[Address]) -> Option<String> {
    if addresses.is_empty() {
        return None;
    }

    let joined = addresses
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Some(joined)
}

impl EmailMessage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_from(mut self, from: impl Into<Address>) -> Self {
        self.from = vec![from.into()];
        self
    }

    pub fn with_sender(mut self, sender: impl Into<Address>) -> Self {
        self.sender = vec![sender.into()];
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<Address>) -> Self {
        self.reply_to = vec![reply_to.into()];
        self
    }

    pub fn with_return_path(mut self, return_path: impl Into<Address>) -> Self {
        self.return_path = vec![return_path.into()];
        self
    }

    pub fn with_to(mut self, to: impl Into<Address>) -> Self {
        self.to.push(to.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<Address>) -> Self {
        self.cc.push(cc.into());
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<Address>) -> Self {
        self.bcc.push(bcc.into());
        self
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn with_format(mut self, format: EmailFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets a custom header. An existing header with the same name
    /// (case-insensitive) is replaced in place.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let existing = self
            .headers
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name));

        match existing {
            Some(i) => self.headers[i].1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }

        self
    }

    /// Look up a header value by its canonical name.
    ///
    /// Address headers are rendered as `Name <email>` joined by `", "`.
    /// Absent or empty values return `None`.
    pub fn header(&self, name: &str) -> Option<String> {
        let value = match name.to_ascii_lowercase().as_str() {
            "from" => join_addresses(&self.from),
            "sender" => join_addresses(&self.sender),
            "reply-to" => join_addresses(&self.reply_to),
            "return-path" => join_addresses(&self.return_path),
            "to" => join_addresses(&self.to),
            "cc" => join_addresses(&self.cc),
            "bcc" => join_addresses(&self.bcc),
            "subject" => self.subject.clone(),
            _ => self
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
        };

        value.filter(|v| !v.is_empty())
    }

    /// Body content for one format tag (`text` or `html`)
    pub fn body(&self, format: EmailFormat) -> Option<&str> {
        match format {
            EmailFormat::Text => self.text.as_deref(),
            EmailFormat::Html => self.html.as_deref(),
            EmailFormat::Both => None,
        }
    }
}
