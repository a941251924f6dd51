//! Blocking HTTP(S) convenience facade.
//!
//! # Overview
//! `HttpTemplate` turns a URL, a parameter mapping and a method into one
//! HTTP exchange and hands the decoded response body to a caller-supplied
//! parser. GET and POST are supported; POST parameters travel as a
//! form-urlencoded body.
//!
//! # Design
//! - Configuration (`HttpConfig`) is immutable and built once through a
//!   fluent builder.
//! - Every call creates its own transport through a `Connector` and closes
//!   it before returning, so a template is safe to share between threads.
//! - All failures collapse into one `HttpError` with a numeric code.
//! - `Protocol::Https` trusts every certificate and hostname. It is meant for
//!   internal or test endpoints only; see [`tls`].

pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod template;
pub mod tls;
pub mod transport;

pub use config::{Charset, HttpConfig, HttpConfigBuilder, Protocol};
pub use error::{BoxError, ErrorKind, HttpError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{encode_form, to_params, Params};
pub use template::{json, text, HttpTemplate, HttpTemplateBuilder, ResultParser};
pub use transport::{ConnectSettings, Connector, Transport, UreqConnector, UreqTransport};
