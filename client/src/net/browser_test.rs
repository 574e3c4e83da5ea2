use registry::http::Method;

use super::*;

// =============================================================
// Native stubs
// =============================================================

#[test]
fn token_store_reads_nothing_outside_browser() {
    let store = LocalStorageTokenStore;
    store.save("a.b.c");
    assert_eq!(store.read(), None);
    store.clear();
}

#[test]
fn navigator_is_inert_outside_browser() {
    LocationNavigator.navigate("/login");
}

#[test]
fn transport_error_names_the_request() {
    let request = HttpRequest {
        method: Method::Get,
        url: "http://localhost:8080/student/count".to_owned(),
        headers: Vec::new(),
        body: None,
    };
    let err = futures::executor::block_on(GlooTransport.send(request)).expect_err("no fetch natively");
    assert_eq!(
        err,
        TransportError::Other("GET http://localhost:8080/student/count: fetch is only available in the browser".to_owned())
    );
}

#[test]
fn recaptcha_is_unavailable_outside_browser() {
    let err = futures::executor::block_on(recaptcha_token("site-key")).expect_err("no script natively");
    assert_eq!(err, CAPTCHA_UNAVAILABLE);
}
