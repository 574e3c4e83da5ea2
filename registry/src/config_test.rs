use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = RegistryConfig::from_lookup(lookup_from(&[])).expect("config");
    assert_eq!(config, RegistryConfig::default());
    assert_eq!(config.api_base_url, "http://localhost:8080");
}

#[test]
fn base_url_override_drops_trailing_slash() {
    let config =
        RegistryConfig::from_lookup(lookup_from(&[(API_BASE_URL_ENV, "https://api.example.org/")])).expect("config");
    assert_eq!(config.api_base_url, "https://api.example.org");
}

#[test]
fn blank_override_falls_back_to_default() {
    let config = RegistryConfig::from_lookup(lookup_from(&[(API_BASE_URL_ENV, "   ")])).expect("config");
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn site_key_override_is_used() {
    let config = RegistryConfig::from_lookup(lookup_from(&[(RECAPTCHA_SITE_KEY_ENV, "site-key")])).expect("config");
    assert_eq!(config.recaptcha_site_key, "site-key");
}

#[test]
fn relative_base_url_is_rejected() {
    let err = RegistryConfig::new("/api").expect_err("should be invalid");
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
}

#[test]
fn non_http_scheme_is_rejected() {
    let err = RegistryConfig::new("ftp://files.example.org").expect_err("should be invalid");
    assert!(err.to_string().contains("unsupported scheme"));
}
