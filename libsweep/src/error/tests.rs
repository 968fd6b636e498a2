use super::*;

#[test]
fn test_network_error_display() {
    let err = SweepError::network("connection refused");
    assert_eq!(err.to_string(), "Network error: connection refused");
}

#[test]
fn test_network_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let err = SweepError::network_with_source("failed to connect", io_err);
    assert!(matches!(err, SweepError::Network { source: Some(_), .. }));
}

#[test]
fn test_authentication_error_carries_status() {
    let err = SweepError::authentication("bad credentials", Some(401));
    match err {
        SweepError::Authentication { status_code, .. } => assert_eq!(status_code, Some(401)),
        _ => panic!("expected Authentication error"),
    }
}

#[test]
fn test_not_found_error_display() {
    let err = SweepError::not_found("repository", "develop/api");
    assert_eq!(err.to_string(), "repository not found: develop/api");
}

#[test]
fn test_server_error_display() {
    let err = SweepError::server("internal error", 500);
    assert_eq!(err.to_string(), "Server error (status: 500): internal error");
}

#[test]
fn test_unexpected_status_display() {
    let err = SweepError::unexpected_status("manifest delete", 405);
    assert_eq!(err.to_string(), "Unexpected status 405: manifest delete");
}

#[test]
fn test_invalid_continuation_display() {
    let err = SweepError::invalid_continuation("</v2/_catalog?n=100>; rel=\"next\"");
    assert!(err.to_string().contains("Invalid continuation link"));
}

#[test]
fn test_config_error_with_path() {
    let err = SweepError::config("missing field", Some("/etc/sweep.yaml"));
    match err {
        SweepError::Config { path, .. } => assert_eq!(path.as_deref(), Some("/etc/sweep.yaml")),
        _ => panic!("expected Config error"),
    }
}

#[test]
fn test_from_status_unauthorized() {
    let err = SweepError::from_status(StatusCode::UNAUTHORIZED, "catalog fetch");
    assert!(matches!(err, SweepError::Authentication { status_code: Some(401), .. }));
}

#[test]
fn test_from_status_forbidden() {
    let err = SweepError::from_status(StatusCode::FORBIDDEN, "tag fetch");
    assert!(matches!(err, SweepError::Authentication { status_code: Some(403), .. }));
}

#[test]
fn test_from_status_not_found() {
    let err = SweepError::from_status(StatusCode::NOT_FOUND, "manifest HEAD");
    assert!(matches!(err, SweepError::NotFound { .. }));
}

#[test]
fn test_from_status_server_errors() {
    for code in [500u16, 502, 503, 504] {
        let status = StatusCode::from_u16(code).unwrap();
        let err = SweepError::from_status(status, "walk");
        assert!(matches!(err, SweepError::Server { .. }), "code {}", code);
    }
}

#[test]
fn test_from_status_other_is_unexpected() {
    let err = SweepError::from_status(StatusCode::METHOD_NOT_ALLOWED, "delete");
    match err {
        SweepError::UnexpectedStatus { status_code, .. } => assert_eq!(status_code, 405),
        _ => panic!("expected UnexpectedStatus error"),
    }
}

#[test]
fn test_errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SweepError>();
}
