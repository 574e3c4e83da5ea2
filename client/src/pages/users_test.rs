use super::*;

fn user(username: &str, authorities: &[&str]) -> User {
    User {
        name: "Omar".to_owned(),
        username: username.to_owned(),
        mobile_number: String::new(),
        email: String::new(),
        authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
    }
}

#[test]
fn authorities_are_comma_joined() {
    assert_eq!(authorities_label(&user("omar", &["ADMIN", "USER"])), "ADMIN, USER");
}

#[test]
fn missing_authorities_show_placeholder() {
    assert_eq!(authorities_label(&user("omar", &[])), "-");
}

#[test]
fn own_account_is_not_deletable() {
    assert!(!can_delete(&user("amira", &["ADMIN"]), Some("amira")));
    assert!(can_delete(&user("omar", &["USER"]), Some("amira")));
}
