//! TLS settings for `Protocol::Https`.
//!
//! **Not for production.** The returned configuration accepts any server
//! certificate and skips hostname verification, so it offers no protection
//! against an active attacker. It exists to reach internal or test endpoints
//! that present self-signed certificates.

use ureq::tls::TlsConfig;

/// TLS configuration that trusts every certificate and every hostname.
pub fn trust_all() -> TlsConfig {
    TlsConfig::builder().disable_verification(true).build()
}
