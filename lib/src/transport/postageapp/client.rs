use uuid::Uuid;

use super::api;

use crate::config::PostageAppConfig;
use crate::email::{EmailFormat, EmailMessage};
use crate::encoding;
use crate::transport::client::{HttpClient, ReqwestClient, JSON_CONTENT_TYPE};
use crate::transport::{map_status, SendResult, Transport};
use crate::Error;

/// Sends mail through the PostageApp HTTP API.
///
/// PostageApp has no notion of cc, bcc or sender; messages using any of
/// them are rejected instead of silently losing recipients.
pub struct PostageAppTransport<C = ReqwestClient> {
    api_key: String,
    client: C,
}

impl PostageAppTransport {
    pub fn new(config: PostageAppConfig) -> Result<Self, Error> {
        Self::with_client(config, ReqwestClient::new()?)
    }
}

impl<C: HttpClient> PostageAppTransport<C> {
    pub fn with_client(config: PostageAppConfig, client: C) -> Result<Self, Error> {
        let api_key = config
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("PostageApp api_key is not set".to_string()))?;

        Ok(Self { api_key, client })
    }

    fn check_supported(email: &EmailMessage) -> Result<(), Error> {
        let present = [
            ("cc", !email.cc.is_empty()),
            ("bcc", !email.bcc.is_empty()),
            ("sender", !email.sender.is_empty()),
        ];

        match present.iter().find(|&&(_, used)| used) {
            Some(&(field, _)) => Err(Error::UnsupportedField(field.to_string())),
            None => Ok(()),
        }
    }

    /// Map the email onto PostageApp `arguments`, attachments included
    pub fn build_message(&self, email: &EmailMessage) -> Result<api::Message, Error> {
        Self::check_supported(email)?;

        let mut message = api::Message {
            recipients: email.header("To"),
            headers: api::Headers {
                from: email.header("From"),
                subject: email.header("Subject"),
                reply_to: email.header("Reply-To"),
                x_mailer: email.header("X-Mailer"),
                mime_version: email.header("MIME-Version"),
                content_transfer_encoding: email.header("Content-Transfer-Encoding"),
            },
            ..Default::default()
        };

        if email.format.has_text() {
            message.content.text = Some(email.body(EmailFormat::Text).unwrap_or_default().to_string());
        }

        if email.format.has_html() {
            message.content.html = Some(email.body(EmailFormat::Html).unwrap_or_default().to_string());
        }

        for attachment in &email.attachments {
            message.attachments.insert(
                attachment.filename.clone(),
                api::Attachment {
                    content: encoding::read_encoded(&attachment.path)?,
                    content_type: attachment.mimetype.clone(),
                },
            );
        }

        Ok(message)
    }
}

impl<C: HttpClient> Transport for PostageAppTransport<C> {
    fn send(&self, email: &EmailMessage) -> Result<SendResult, Error> {
        let message = serde_json::to_value(self.build_message(email)?)?;
        let url = api::build_endpoint_url()?;

        let request = api::Request {
            api_key: &self.api_key,
            uid: Uuid::new_v4(),
            arguments: &message,
        };

        log::debug!("Posting message {} to {}", request.uid, url);

        let headers = [
            ("Accept", JSON_CONTENT_TYPE),
            ("Content-Type", JSON_CONTENT_TYPE),
        ];

        let resp = self
            .client
            .post_json(&url, &headers, &serde_json::to_value(&request)?)?;
        log::info!("PostageApp responded with status {}", resp.status);

        let response = map_status(resp, api::ERROR_MESSAGE_POINTER)?;

        Ok(SendResult { message, response })
    }
}
