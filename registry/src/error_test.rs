use super::*;

#[test]
fn connect_failure_translates_to_network_error() {
    let err: ApiError = TransportError::Connect("dns".to_owned()).into();
    assert_eq!(err, ApiError::Network);
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}

#[test]
fn other_transport_failure_keeps_its_message() {
    let err: ApiError = TransportError::Other("body read".to_owned()).into();
    assert_eq!(err, ApiError::Transport("body read".to_owned()));
}

#[test]
fn status_error_displays_server_message() {
    let err = ApiError::Status { status: 409, message: "code already used".to_owned() };
    assert_eq!(err.to_string(), "code already used");
    assert_eq!(err.status(), Some(409));
}

#[test]
fn auth_expired_reports_401() {
    assert_eq!(ApiError::AuthExpired.status(), Some(401));
    assert_eq!(ApiError::AuthExpired.to_string(), SESSION_EXPIRED_MESSAGE);
}

#[test]
fn server_error_message_formats_status() {
    assert_eq!(server_error_message(502), "server error: 502");
}

#[test]
fn login_error_wraps_api_error_transparently() {
    let err: LoginError = ApiError::Network.into();
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}
