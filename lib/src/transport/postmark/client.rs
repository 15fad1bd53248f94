use super::api;

use crate::config::{DebugMode, PostmarkConfig};
use crate::email::{EmailFormat, EmailMessage};
use crate::encoding;
use crate::transport::client::{HttpClient, ReqwestClient, JSON_CONTENT_TYPE};
use crate::transport::{map_status, SendResult, Transport};
use crate::Error;

/// Sends mail through the Postmark HTTP API
pub struct PostmarkTransport<C = ReqwestClient> {
    config: PostmarkConfig,
    client: C,
}

impl PostmarkTransport {
    pub fn new(config: PostmarkConfig) -> Result<Self, Error> {
        Ok(Self::with_client(config, ReqwestClient::new()?))
    }
}

impl<C: HttpClient> PostmarkTransport<C> {
    pub fn with_client(config: PostmarkConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Token sent to Postmark. Sandbox mode does not need a configured key.
    fn server_token(&self) -> Result<&str, Error> {
        if self.config.debug == DebugMode::Sandbox {
            return Ok(api::POSTMARK_TEST_TOKEN);
        }

        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("Postmark api_key is not set".to_string()))
    }

    /// Map the email onto a Postmark message, attachments included
    pub fn build_message(&self, email: &EmailMessage) -> Result<api::Message, Error> {
        let mut message = api::Message {
            from: email.header("From"),
            to: email.header("To"),
            cc: email.header("Cc"),
            bcc: email.header("Bcc"),
            subject: email.header("Subject"),
            reply_to: email.header("Reply-To"),
            // X-Tag wins over the configured default
            tag: email
                .header(api::TAG_HEADER)
                .or_else(|| self.config.tag.clone().filter(|t| !t.is_empty())),
            ..Default::default()
        };

        message.headers = api::EXTRA_HEADERS
            .iter()
            .filter_map(|name| {
                email.header(name).map(|value| api::Header {
                    name: name.to_string(),
                    value,
                })
            })
            .collect();

        if email.format.has_text() {
            message.text_body = Some(email.body(EmailFormat::Text).unwrap_or_default().to_string());
        }

        if email.format.has_html() {
            message.html_body = Some(email.body(EmailFormat::Html).unwrap_or_default().to_string());
        }

        for attachment in &email.attachments {
            message.attachments.push(api::Attachment {
                name: attachment.filename.clone(),
                content: encoding::read_encoded(&attachment.path)?,
                content_type: attachment.mimetype.clone(),
            });
        }

        if let DebugMode::Redirect(ref address) = self.config.debug {
            message.to = Some(address.clone());
            message.cc = None;
            message.bcc = None;
        }

        Ok(message)
    }
}

impl<C: HttpClient> Transport for PostmarkTransport<C> {
    fn send(&self, email: &EmailMessage) -> Result<SendResult, Error> {
        let token = self.server_token()?;
        let message = serde_json::to_value(self.build_message(email)?)?;
        let url = api::build_endpoint_url(self.config.secure)?;

        log::debug!("Posting message to {}", url);

        let headers = [
            ("Accept", JSON_CONTENT_TYPE),
            ("Content-Type", JSON_CONTENT_TYPE),
            (api::POSTMARK_TOKEN_HEADER, token),
        ];

        let resp = self.client.post_json(&url, &headers, &message)?;
        log::info!("Postmark responded with status {}", resp.status);

        let response = map_status(resp, api::ERROR_MESSAGE_POINTER)?;

        Ok(SendResult { message, response })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::json;

    use super::*;
    use crate::email::{Address, Attachment};
    use crate::transport::client::mock::{FailingClient, MockClient};

    const OK_RESPONSE: &str = r#"{"ErrorCode": 0, "Message": "OK", "MessageID": "b7bc2f4a"}"#;

    fn config() -> PostmarkConfig {
        PostmarkConfig {
            api_key: Some("server-token".to_string()),
            ..Default::default()
        }
    }

    fn transport(config: PostmarkConfig, status: u16, body: &str) -> PostmarkTransport<MockClient> {
        PostmarkTransport::with_client(config, MockClient::new(status, body))
    }

    fn get_mail() -> EmailMessage {
        EmailMessage::new()
            .with_from(Address::with_name("noreply@example.com", "Example"))
            .with_to("alice@example.com")
            .with_cc("bob@example.com")
            .with_bcc("carol@example.com")
            .with_reply_to("support@example.com")
            .with_subject("Hello")
            .with_format(EmailFormat::Both)
            .with_text("Hello there!")
            .with_html("<p>Hello there!</p>")
            .with_header("X-Mailer", "mailpost")
            .with_header("MIME-Version", "1.0")
    }

    #[test]
    fn map_headers() {
        let t = transport(config(), 200, OK_RESPONSE);
        let message = t.build_message(&get_mail()).unwrap();

        assert_eq!(message.from.as_deref(), Some("Example <noreply@example.com>"));
        assert_eq!(message.to.as_deref(), Some("alice@example.com"));
        assert_eq!(message.cc.as_deref(), Some("bob@example.com"));
        assert_eq!(message.bcc.as_deref(), Some("carol@example.com"));
        assert_eq!(message.reply_to.as_deref(), Some("support@example.com"));
        assert_eq!(message.subject.as_deref(), Some("Hello"));
        assert_eq!(message.tag, None);
    }

    #[test]
    fn extra_headers_keep_fixed_order() {
        let mail = EmailMessage::new()
            .with_header("Content-Transfer-Encoding", "8bit")
            .with_header("X-Custom", "ignored")
            .with_header("X-Mailer", "mailpost");

        let t = transport(config(), 200, OK_RESPONSE);
        let message = t.build_message(&mail).unwrap();

        let names: Vec<&str> = message.headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["X-Mailer", "Content-Transfer-Encoding"]);
    }

    #[test]
    fn body_by_format() {
        let t = transport(config(), 200, OK_RESPONSE);

        let both = t.build_message(&get_mail()).unwrap();
        assert_eq!(both.text_body.as_deref(), Some("Hello there!"));
        assert_eq!(both.html_body.as_deref(), Some("<p>Hello there!</p>"));

        let text = t
            .build_message(&get_mail().with_format(EmailFormat::Text))
            .unwrap();
        assert!(text.text_body.is_some());
        assert!(text.html_body.is_none());

        let html = t
            .build_message(&get_mail().with_format(EmailFormat::Html))
            .unwrap();
        assert!(html.text_body.is_none());
        assert!(html.html_body.is_some());
    }

    #[test]
    fn tag_from_header_wins() {
        let mut config = config();
        config.tag = Some("default-tag".to_string());
        let t = transport(config, 200, OK_RESPONSE);

        let tagged = t
            .build_message(&get_mail().with_header("X-Tag", "welcome"))
            .unwrap();
        assert_eq!(tagged.tag.as_deref(), Some("welcome"));

        let untagged = t.build_message(&get_mail()).unwrap();
        assert_eq!(untagged.tag.as_deref(), Some("default-tag"));
    }

    #[test]
    fn attachments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(300).collect();
        file.write_all(&data).unwrap();

        let mail = get_mail().with_attachment(Attachment::new("data.bin", file.path(), "application/octet-stream"));
        let t = transport(config(), 200, OK_RESPONSE);
        let message = t.build_message(&mail).unwrap();

        assert_eq!(message.attachments.len(), 1);
        let attachment = &message.attachments[0];
        assert_eq!(attachment.name, "data.bin");
        assert_eq!(attachment.content_type, "application/octet-stream");

        let joined: String = attachment.content.split("\r\n").collect();
        assert_eq!(STANDARD.decode(joined).unwrap(), data);
    }

    #[test]
    fn unreadable_attachment() {
        let mail = get_mail().with_attachment(Attachment::new(
            "gone.txt",
            "/nonexistent/mailpost/gone.txt",
            "text/plain",
        ));
        let t = transport(config(), 200, OK_RESPONSE);

        assert!(matches!(t.send(&mail), Err(Error::FileRead { .. })));
        assert!(t.client.requests.borrow().is_empty());
    }

    #[test]
    fn debug_redirect() {
        let mut config = config();
        config.debug = DebugMode::Redirect("test@example.com".to_string());
        let t = transport(config, 200, OK_RESPONSE);

        let result = t.send(&get_mail()).unwrap();
        let request = t.client.last_request();

        assert_eq!(result.message["To"], json!("test@example.com"));
        assert!(result.message.get("Cc").is_none());
        assert!(result.message.get("Bcc").is_none());
        assert_eq!(
            request.header(api::POSTMARK_TOKEN_HEADER),
            Some("server-token")
        );
    }

    #[test]
    fn debug_sandbox() {
        let mut config = config();
        config.debug = DebugMode::Sandbox;
        let t = transport(config, 200, OK_RESPONSE);

        let result = t.send(&get_mail()).unwrap();
        let request = t.client.last_request();

        assert_eq!(
            request.header(api::POSTMARK_TOKEN_HEADER),
            Some(api::POSTMARK_TEST_TOKEN)
        );
        assert_eq!(result.message["Cc"], json!("bob@example.com"));
    }

    #[test]
    fn sandbox_without_key() {
        let config = PostmarkConfig {
            debug: DebugMode::Sandbox,
            ..Default::default()
        };
        let t = transport(config, 200, OK_RESPONSE);

        assert!(t.send(&get_mail()).is_ok());
    }

    #[test]
    fn missing_key() {
        let t = transport(PostmarkConfig::default(), 200, OK_RESPONSE);

        assert!(matches!(t.send(&get_mail()), Err(Error::Config(_))));
        assert!(t.client.requests.borrow().is_empty());
    }

    #[test]
    fn request_shape() {
        let mut config = config();
        config.secure = true;
        let t = transport(config, 200, OK_RESPONSE);

        t.send(&get_mail()).unwrap();
        let request = t.client.last_request();

        assert_eq!(request.url, "https://api.postmarkapp.com/email");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body["Headers"],
            json!([
                {"Name": "X-Mailer", "Value": "mailpost"},
                {"Name": "MIME-Version", "Value": "1.0"}
            ])
        );
    }

    #[test]
    fn insecure_uses_http() {
        let t = transport(config(), 200, OK_RESPONSE);

        t.send(&get_mail()).unwrap();

        assert_eq!(t.client.last_request().url, "http://api.postmarkapp.com/email");
    }

    #[test]
    fn provider_error() {
        let t = transport(config(), 500, r#"{"ErrorCode": 300, "Message": "bad request"}"#);

        assert_eq!(
            t.send(&get_mail()),
            Err(Error::Provider {
                status: 500,
                message: "bad request".to_string()
            })
        );
    }

    #[test]
    fn success_result() {
        let t = transport(config(), 200, OK_RESPONSE);

        let result = t.send(&get_mail()).unwrap();
        let request = t.client.last_request();

        assert_eq!(result.message, request.body);
        assert_eq!(
            result.response,
            serde_json::from_str::<serde_json::Value>(OK_RESPONSE).unwrap()
        );
    }

    #[test]
    fn transport_error_is_propagated() {
        let t = PostmarkTransport::with_client(config(), FailingClient);

        assert!(matches!(t.send(&get_mail()), Err(Error::RequestError(_))));
    }
}
