//! Immutable template configuration and its builder.

use std::borrow::Cow;
use std::time::Duration;

use encoding_rs::{EncoderResult, Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::http::HttpMethod;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_CHARSET: &str = "UTF-8";
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport protocol used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Http,
    /// HTTPS with certificate and hostname verification disabled.
    Https,
}

/// Configuration shared by every call made through one `HttpTemplate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub protocol: Protocol,
    pub content_type: String,
    pub charset: String,
    pub request_method: HttpMethod,
    #[serde(with = "millis")]
    pub connection_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::Http,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            request_method: HttpMethod::Post,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }

    /// Resolve the configured charset label.
    pub fn charset(&self) -> Result<Charset, HttpError> {
        Charset::from_label(&self.charset)
    }
}

/// Fluent builder for `HttpConfig`, starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.config.charset = charset.into();
        self
    }

    pub fn request_method(mut self, method: HttpMethod) -> Self {
        self.config.request_method = method;
        self
    }

    /// Connect and socket timeout applied to HTTPS transports.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub fn build(self) -> HttpConfig {
        self.config
    }
}

/// Character set used for request bodies and response decoding.
///
/// Labels resolve through the WHATWG encoding registry, so `latin1` and
/// `ISO-8859-1` both name windows-1252 and `name()` reports the canonical
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    pub fn utf8() -> Self {
        Charset { encoding: UTF_8 }
    }

    pub fn from_label(label: &str) -> Result<Self, HttpError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Charset { encoding })
            .ok_or_else(|| HttpError::internal(format!("unsupported charset: {label}")))
    }

    pub fn name(self) -> &'static str {
        self.encoding.name()
    }

    /// Unmappable characters become `?`.
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        let encoding = self.encoding.output_encoding();
        if encoding == UTF_8 || (text.is_ascii() && encoding.is_ascii_compatible()) {
            return Cow::Borrowed(text.as_bytes());
        }

        let mut encoder = encoding.new_encoder();
        let mut out = Vec::with_capacity(text.len() + 16);
        let mut rest = text;
        loop {
            let (result, read) =
                encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
            rest = &rest[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => out.reserve(rest.len() * 4 + 16),
                EncoderResult::Unmappable(_) => out.push(b'?'),
            }
        }
        Cow::Owned(out)
    }

    /// Invalid sequences become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        let (text, _) = self.encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}

mod millis {
    use std::time::Duration;

    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis())
            .map_err(|_| S::Error::custom("timeout does not fit in u64 milliseconds"))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
