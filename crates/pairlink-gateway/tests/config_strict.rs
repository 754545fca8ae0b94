#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pairlink_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
  ping_intervall_ms: 20000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert!(cfg.ice.is_none());
}

#[test]
fn version_must_be_one() {
    let bad = r#"
version: 2
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn idle_timeout_must_exceed_ping_interval() {
    let bad = r#"
version: 1
gateway:
  ping_interval_ms: 20000
  idle_timeout_ms: 15000
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ice_section_is_validated() {
    let bad = r#"
version: 1
ice:
  token_url: ""
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

    let ok = r#"
version: 1
ice:
  token_url: "https://tokens.example.net/v1"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.ice.unwrap().timeout_ms, 5000);
}
