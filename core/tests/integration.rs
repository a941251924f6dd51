//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `HttpTemplate` over
//! real HTTP with the default ureq transport. Verifies request encoding,
//! status validation, empty-body handling and charset decoding end-to-end.

use std::net::SocketAddr;
use std::time::Duration;

use http_template::{
    json, text, ErrorKind, HttpError, HttpMethod, HttpTemplate, Params, Protocol,
};
use serde::Serialize;

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn get_ping_returns_parsed_pong() {
    let addr = start_server();
    let template = HttpTemplate::new();

    let out = template
        .do_get(&format!("http://{addr}/ping"), |body: String| {
            Ok::<_, HttpError>(body.to_uppercase())
        })
        .unwrap();
    assert_eq!(out, "PONG");
}

#[test]
fn post_form_round_trips_through_server() {
    let addr = start_server();
    let template = HttpTemplate::new();

    let echo: serde_json::Value = template
        .do_post(
            &format!("http://{addr}/form"),
            &params(&[("a", "1"), ("b", "two words"), ("c", "é&=")]),
            json(),
        )
        .unwrap();
    assert_eq!(echo["fields"]["a"], "1");
    assert_eq!(echo["fields"]["b"], "two words");
    assert_eq!(echo["fields"]["c"], "é&=");
    assert_eq!(
        echo["content_type"],
        "application/x-www-form-urlencoded; charset=UTF-8"
    );
}

#[test]
fn post_body_is_order_independent_form() {
    let addr = start_server();
    let template = HttpTemplate::new();

    let raw = template
        .do_post(
            &format!("http://{addr}/echo"),
            &params(&[("b", "2"), ("a", "1")]),
            text(),
        )
        .unwrap();
    let decoded: Params = url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(decoded, params(&[("a", "1"), ("b", "2")]));
}

#[test]
fn submit_500_fails_without_parsing() {
    let addr = start_server();
    let template = HttpTemplate::new();
    let mut parsed = false;

    let err = template
        .do_post(
            &format!("http://{addr}/submit"),
            &params(&[("a", "1"), ("b", "2")]),
            |_body: String| {
                parsed = true;
                Ok::<_, HttpError>(())
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseStatusInvalid);
    assert_eq!(err.status(), Some(500));
    assert!(!parsed);
}

#[test]
fn non_200_success_codes_are_rejected() {
    let addr = start_server();
    let template = HttpTemplate::new();

    for code in [201, 202, 404] {
        let err = template
            .do_get(&format!("http://{addr}/status/{code}"), text())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseStatusInvalid, "status {code}");
        assert_eq!(err.status(), Some(code));
    }
}

#[test]
fn no_content_is_response_empty() {
    let addr = start_server();
    let template = HttpTemplate::new();

    let err = template
        .do_get(&format!("http://{addr}/empty"), text())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseEmpty);
}

#[test]
fn unsupported_method_fails_without_network() {
    // Nothing listens on port 9; a network attempt would surface as SystemInternalError.
    let template = HttpTemplate::new();
    let err = template
        .execute("http://127.0.0.1:9/", &Params::new(), HttpMethod::Put, text())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedRequestMethod);
}

#[test]
fn connection_refused_is_internal_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpTemplate::new()
        .do_get(&format!("http://{addr}/ping"), text())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SystemInternalError);
    assert_eq!(err.code(), 10004);
}

#[test]
fn object_params_are_posted_as_form() {
    #[derive(Serialize)]
    struct Signup {
        name: String,
        age: u8,
        referrer: Option<String>,
    }

    let addr = start_server();
    let echo: serde_json::Value = HttpTemplate::new()
        .do_post_object(
            &format!("http://{addr}/form"),
            &Signup {
                name: "Ada".to_string(),
                age: 36,
                referrer: None,
            },
            json(),
        )
        .unwrap();
    assert_eq!(echo["fields"]["name"], "Ada");
    assert_eq!(echo["fields"]["age"], "36");
    assert!(echo["fields"].get("referrer").is_none());
}

#[test]
fn default_request_method_drives_do_request() {
    let addr = start_server();
    let template = HttpTemplate::builder()
        .request_method(HttpMethod::Get)
        .build();

    let out = template
        .do_request(&format!("http://{addr}/ping"), &Params::new(), text())
        .unwrap();
    assert_eq!(out, "pong");
}

#[test]
fn raw_body_carries_configured_content_type() {
    let addr = start_server();
    let template = HttpTemplate::builder().content_type("text/plain").build();

    let out = template
        .do_post_body(&format!("http://{addr}/content-type"), "hello", text())
        .unwrap();
    assert_eq!(out, "text/plain; charset=UTF-8");
}

#[test]
fn latin1_body_is_decoded_with_configured_charset() {
    let addr = start_server();
    let template = HttpTemplate::builder().charset("ISO-8859-1").build();

    let out = template
        .do_get(&format!("http://{addr}/latin1"), text())
        .unwrap();
    assert_eq!(out, "café");
}

#[test]
fn gbk_form_is_sent_as_double_byte_sequences() {
    let addr = start_server();
    let template = HttpTemplate::builder().charset("GBK").build();

    let raw = template
        .do_post(&format!("http://{addr}/echo"), &params(&[("city", "北京")]), text())
        .unwrap();
    assert_eq!(raw, "city=%B1%B1%BE%A9");
}

#[test]
fn gbk_body_is_decoded_with_configured_charset() {
    let addr = start_server();
    let template = HttpTemplate::builder().charset("GBK").build();

    let out = template
        .do_get(&format!("http://{addr}/gbk"), text())
        .unwrap();
    assert_eq!(out, "中文");
}

#[test]
fn large_body_over_ten_mebibytes_is_read() {
    let addr = start_server();

    let out = HttpTemplate::new()
        .do_get(&format!("http://{addr}/large"), text())
        .unwrap();
    assert_eq!(out.len(), mock_server::LARGE_BODY_LEN);
    assert!(out.bytes().all(|b| b == b'x'));
}

#[test]
fn https_template_still_speaks_plain_http() {
    let addr = start_server();
    let template = HttpTemplate::builder()
        .protocol(Protocol::Https)
        .connection_timeout(Duration::from_secs(5))
        .build();

    let out = template
        .do_get(&format!("http://{addr}/ping"), text())
        .unwrap();
    assert_eq!(out, "pong");
}

#[test]
fn template_is_shareable_across_threads() {
    let addr = start_server();
    let template = std::sync::Arc::new(HttpTemplate::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let template = template.clone();
            std::thread::spawn(move || {
                template
                    .do_get(&format!("http://{addr}/ping"), text())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "pong");
    }
}
