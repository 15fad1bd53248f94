//! Outbound mail transports for the Postmark and PostageApp HTTP APIs.
//!
//! Build an [`email::EmailMessage`], pick a transport and call
//! [`transport::Transport::send`]:
//!
//! ```no_run
//! use mailpost::config::PostmarkConfig;
//! use mailpost::email::EmailMessage;
//! use mailpost::transport::{PostmarkTransport, Transport};
//!
//! # fn main() -> Result<(), mailpost::Error> {
//! let config = PostmarkConfig {
//!     api_key: Some("server-token".to_string()),
//!     secure: true,
//!     ..Default::default()
//! };
//!
//! let email = EmailMessage::new()
//!     .with_from("noreply@example.com")
//!     .with_to("alice@example.com")
//!     .with_subject("Hello")
//!     .with_text("Hello there!");
//!
//! let result = PostmarkTransport::new(config)?.send(&email)?;
//! println!("{}", result.response);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod email;
pub mod encoding;
pub mod transport;
mod error;

pub use error::Error;
pub use transport::{Backend, SendResult, Transport};
