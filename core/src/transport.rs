//! The seam between `HttpTemplate` and the HTTP library doing the I/O.
//!
//! # Design
//! A `Connector` creates one `Transport` per call; the template sends a
//! single request through it and then closes it. Keeping both behind traits
//! lets tests record requests and script responses without a network, and
//! lets callers plug in a different client. `UreqConnector` is the default.

use std::time::Duration;

use log::debug;

use crate::config::{HttpConfig, Protocol};
use crate::error::TransportError;
use crate::http::{response_has_body, HttpMethod, HttpRequest, HttpResponse};
use crate::tls;

/// How a transport must be built for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectSettings {
    /// Accept any certificate and hostname.
    pub trust_all: bool,
    /// Connect and socket timeout. `None` keeps the client's defaults.
    pub timeout: Option<Duration>,
}

impl ConnectSettings {
    pub fn for_config(config: &HttpConfig) -> Self {
        match config.protocol {
            Protocol::Http => Self {
                trust_all: false,
                timeout: None,
            },
            Protocol::Https => Self {
                trust_all: true,
                timeout: Some(config.connection_timeout),
            },
        }
    }
}

/// Builds a fresh transport for each exchange.
pub trait Connector {
    type Transport: Transport;

    fn connect(&self, settings: &ConnectSettings) -> Result<Self::Transport, TransportError>;
}

/// Executes a single request and releases its resources on `close`.
pub trait Transport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;

    fn close(self) -> Result<(), TransportError>;
}

/// Connector backed by a `ureq` agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqConnector;

impl Connector for UreqConnector {
    type Transport = UreqTransport;

    fn connect(&self, settings: &ConnectSettings) -> Result<UreqTransport, TransportError> {
        // Status interpretation belongs to the template, not the agent.
        let mut builder = ureq::Agent::config_builder().http_status_as_error(false);
        if settings.trust_all {
            builder = builder.tls_config(tls::trust_all());
        }
        if let Some(timeout) = settings.timeout {
            builder = builder
                .timeout_connect(Some(timeout))
                .timeout_send_request(Some(timeout))
                .timeout_recv_response(Some(timeout))
                .timeout_recv_body(Some(timeout));
        }
        Ok(UreqTransport {
            agent: builder.build().new_agent(),
        })
    }
}

/// A `ureq` agent used for exactly one exchange.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Transport for UreqTransport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("{} {}", request.method, request.url);

        let result = match request.method {
            HttpMethod::Get | HttpMethod::Delete | HttpMethod::Head => {
                let mut builder = match request.method {
                    HttpMethod::Get => self.agent.get(request.url.as_str()),
                    HttpMethod::Delete => self.agent.delete(request.url.as_str()),
                    _ => self.agent.head(request.url.as_str()),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = match request.method {
                    HttpMethod::Post => self.agent.post(request.url.as_str()),
                    _ => self.agent.put(request.url.as_str()),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_slice()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = if response_has_body(request.method, status) {
            // ureq caps bodies at 10 MiB by default; the whole entity is wanted.
            Some(
                response
                    .body_mut()
                    .with_config()
                    .limit(u64::MAX)
                    .read_to_vec()?,
            )
        } else {
            None
        };
        debug!("{} {} -> {status}", request.method, request.url);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn close(self) -> Result<(), TransportError> {
        drop(self.agent);
        Ok(())
    }
}
