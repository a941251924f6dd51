//! The `HttpTemplate` facade.
//!
//! # Design
//! `HttpTemplate` holds only an immutable `HttpConfig` and a `Connector`.
//! Each call connects a fresh transport, sends exactly one request, checks
//! that the response has a body and a 200 status, decodes the body with the
//! configured charset and hands the text to a caller-supplied parser. The
//! transport is closed on every path. No retries, no shared per-call state,
//! so one template can serve concurrent callers.

use std::time::Duration;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Charset, HttpConfig, HttpConfigBuilder, Protocol};
use crate::error::{BoxError, HttpError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{encode_form, to_params, Params};
use crate::transport::{ConnectSettings, Connector, Transport, UreqConnector};

/// Turns a decoded response body into the caller's result type.
///
/// Implemented for every `FnOnce(String) -> Result<T, E>` whose error boxes
/// into `BoxError`. A parser that fails with an `HttpError` has it returned
/// as is; any other failure becomes `SystemInternalError`.
pub trait ResultParser<T> {
    fn parse_result(self, body: String) -> Result<T, BoxError>;
}

impl<T, E, F> ResultParser<T> for F
where
    F: FnOnce(String) -> Result<T, E>,
    E: Into<BoxError>,
{
    fn parse_result(self, body: String) -> Result<T, BoxError> {
        self(body).map_err(Into::into)
    }
}

/// Parser deserializing the body as JSON.
pub fn json<T: DeserializeOwned>() -> impl ResultParser<T> {
    |body: String| serde_json::from_str::<T>(&body)
}

/// Parser returning the decoded body unchanged.
pub fn text() -> impl ResultParser<String> {
    |body: String| Ok::<_, HttpError>(body)
}

/// Blocking HTTP facade configured once and used for many calls.
#[derive(Debug, Clone)]
pub struct HttpTemplate<C = UreqConnector> {
    config: HttpConfig,
    connector: C,
}

impl HttpTemplate {
    /// Template with the default configuration.
    pub fn new() -> Self {
        Self::from_config(HttpConfig::default())
    }

    pub fn builder() -> HttpTemplateBuilder {
        HttpTemplateBuilder::default()
    }

    pub fn from_config(config: HttpConfig) -> Self {
        Self::with_connector(config, UreqConnector)
    }
}

impl Default for HttpTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> HttpTemplate<C> {
    pub fn with_connector(config: HttpConfig, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// GET `url`; query parameters must already be part of it.
    pub fn do_get<T>(&self, url: &str, parser: impl ResultParser<T>) -> Result<T, HttpError> {
        self.execute(url, &Params::new(), HttpMethod::Get, parser)
    }

    /// POST `params` to `url` as a form body.
    pub fn do_post<T>(
        &self,
        url: &str,
        params: &Params,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError> {
        self.execute(url, params, HttpMethod::Post, parser)
    }

    /// POST the fields of `params` to `url` as a form body.
    pub fn do_post_object<T, P>(
        &self,
        url: &str,
        params: &P,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError>
    where
        P: Serialize + ?Sized,
    {
        self.execute_object(url, params, HttpMethod::Post, parser)
    }

    /// Send `params` with the configured default request method.
    pub fn do_request<T>(
        &self,
        url: &str,
        params: &Params,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError> {
        self.execute(url, params, self.config.request_method, parser)
    }

    /// POST a raw body labelled with the configured content type.
    pub fn do_post_body<T>(
        &self,
        url: &str,
        body: &str,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError> {
        let charset = self.config.charset()?;
        let request = HttpRequest::new(HttpMethod::Post, url).with_body(
            format!("{}; charset={}", self.config.content_type, charset.name()),
            charset.encode(body).into_owned(),
        );
        self.exchange(&request, charset, parser)
    }

    pub fn execute_object<T, P>(
        &self,
        url: &str,
        params: &P,
        method: HttpMethod,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError>
    where
        P: Serialize + ?Sized,
    {
        let params = to_params(params)?;
        self.execute(url, &params, method, parser)
    }

    pub fn execute<T>(
        &self,
        url: &str,
        params: &Params,
        method: HttpMethod,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError> {
        let charset = self.config.charset()?;
        let request = build_request(url, params, method, charset)?;
        self.exchange(&request, charset, parser)
    }

    fn exchange<T>(
        &self,
        request: &HttpRequest,
        charset: Charset,
        parser: impl ResultParser<T>,
    ) -> Result<T, HttpError> {
        let settings = ConnectSettings::for_config(&self.config);
        let mut transport = self.connector.connect(&settings)?;

        let outcome = transport
            .send(request)
            .map_err(HttpError::from)
            .and_then(|response| parse_response(response, charset, parser));

        match (outcome, transport.close()) {
            (outcome, Ok(())) => outcome,
            (Ok(_), Err(err)) => Err(HttpError::close_channel(err)),
            (Err(failure), Err(err)) => {
                warn!("failed to close transport for {}: {err}", request.url);
                Err(failure)
            }
        }
    }
}

/// Fluent builder mirroring `HttpConfigBuilder` that yields a template.
#[derive(Debug, Clone, Default)]
pub struct HttpTemplateBuilder {
    config: HttpConfigBuilder,
}

impl HttpTemplateBuilder {
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config = self.config.protocol(protocol);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config = self.config.content_type(content_type);
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.config = self.config.charset(charset);
        self
    }

    pub fn request_method(mut self, method: HttpMethod) -> Self {
        self.config = self.config.request_method(method);
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connection_timeout(timeout);
        self
    }

    pub fn build(self) -> HttpTemplate {
        HttpTemplate::from_config(self.config.build())
    }
}

/// Build the request for `method`, rejecting anything but GET and POST.
///
/// POST carries a form body only when `params` is non-empty. GET never
/// carries a body and ignores `params`.
pub fn build_request(
    url: &str,
    params: &Params,
    method: HttpMethod,
    charset: Charset,
) -> Result<HttpRequest, HttpError> {
    match method {
        HttpMethod::Get => Ok(HttpRequest::new(HttpMethod::Get, url)),
        HttpMethod::Post => {
            let request = HttpRequest::new(HttpMethod::Post, url);
            if params.is_empty() {
                return Ok(request);
            }
            Ok(request.with_body(
                format!("application/x-www-form-urlencoded; charset={}", charset.name()),
                encode_form(params, charset).into_bytes(),
            ))
        }
        _ => Err(HttpError::unsupported_method()),
    }
}

/// Validate `response`, decode its body and run `parser` over it.
pub fn parse_response<T>(
    response: HttpResponse,
    charset: Charset,
    parser: impl ResultParser<T>,
) -> Result<T, HttpError> {
    let Some(body) = response.body else {
        return Err(HttpError::response_empty());
    };
    if response.status != 200 {
        return Err(HttpError::status_invalid(response.status));
    }
    parser
        .parse_result(charset.decode(&body))
        .map_err(HttpError::internal)
}
