use serde::Deserialize;

use crate::Error;

pub const DEFAULT_PATH: &str = "/etc/mailpost/mailpost.toml";
const ENV_PREFIX: &str = "MAILPOST";
const ENV_SEPARATOR: &str = "__";

/// Postmark debug setting.
///
/// `true` switches to the sandbox token, an address redirects every
/// message to that address.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawDebug")]
pub enum DebugMode {
    Off,
    Sandbox,
    Redirect(String),
}

impl Default for DebugMode {
    fn default() -> Self {
        DebugMode::Off
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDebug {
    Flag(bool),
    Address(String),
}

impl From<RawDebug> for DebugMode {
    fn from(raw: RawDebug) -> Self {
        match raw {
            RawDebug::Flag(true) => DebugMode::Sandbox,
            RawDebug::Flag(false) => DebugMode::Off,
            // Environment variables are always strings
            RawDebug::Address(ref s) if s.eq_ignore_ascii_case("true") => DebugMode::Sandbox,
            RawDebug::Address(ref s) if s.is_empty() || s.eq_ignore_ascii_case("false") => {
                DebugMode::Off
            }
            RawDebug::Address(s) => DebugMode::Redirect(s),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostmarkConfig {
    pub api_key: Option<String>,
    /// Use https instead of http
    pub secure: bool,
    /// Tag applied when the message has no X-Tag header
    pub tag: Option<String>,
    pub debug: DebugMode,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostageAppConfig {
    pub api_key: Option<String>,
}

/// One optional section per transport
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub postmark: Option<PostmarkConfig>,
    pub postageapp: Option<PostageAppConfig>,
}

/// Loads mailpost config from filesystem and merges it with any
/// environment variables prefixed with MAILPOST_.
///
/// Nested keys use `__`, e.g. `MAILPOST_POSTMARK__API_KEY`. An explicit
/// `path` must exist; the default path is optional.
///
/// See `mailpost.example.toml` for valid keys.
pub fn load_config(path: Option<&str>) -> Result<Config, Error> {
    load_config_with_prefix(path, ENV_PREFIX)
}

fn load_config_with_prefix(path: Option<&str>, prefix: &str) -> Result<Config, Error> {
    let file = config::File::with_name(path.unwrap_or(DEFAULT_PATH)).required(path.is_some());

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR),
        )
        .build()?;

    log::debug!("Loaded config from {}", path.unwrap_or(DEFAULT_PATH));

    settings.try_deserialize::<Config>().map_err(|e| e.into())
}
