use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{PostageAppTransport, PostmarkTransport, Transport};
use crate::config::Config;
use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Postmark,
    PostageApp,
}

impl Backend {
    /// Build the transport for this backend from its config section
    pub fn transport(self, config: &Config) -> Result<Box<dyn Transport>, Error> {
        match self {
            Self::Postmark => {
                let section = config
                    .postmark
                    .clone()
                    .ok_or_else(|| Error::Config("No [postmark] section found".to_string()))?;
                Ok(Box::new(PostmarkTransport::new(section)?))
            }
            Self::PostageApp => {
                let section = config
                    .postageapp
                    .clone()
                    .ok_or_else(|| Error::Config("No [postageapp] section found".to_string()))?;
                Ok(Box::new(PostageAppTransport::new(section)?))
            }
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::Postmark => write!(f, "Postmark"),
            Self::PostageApp => write!(f, "PostageApp"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postmark" => Ok(Self::Postmark),
            "postageapp" => Ok(Self::PostageApp),
            _ => Err(Error::Config(format!("Unknown backend: {}", s))),
        }
    }
}
