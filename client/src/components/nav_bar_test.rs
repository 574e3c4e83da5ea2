use super::*;

fn session_with(authorities: &[&str]) -> Session {
    Session {
        username: "amira".to_owned(),
        name: "Amira".to_owned(),
        email: None,
        mobile: None,
        authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
        expires_at: time::OffsetDateTime::UNIX_EPOCH,
    }
}

#[test]
fn plain_user_sees_dashboard_and_students() {
    assert_eq!(nav_links(&session_with(&["USER"])), vec![("Dashboard", "/dashboard"), ("Students", "/students")]);
}

#[test]
fn admin_sees_user_management() {
    let links = nav_links(&session_with(&["ADMIN", "USER"]));
    assert_eq!(links, vec![("Dashboard", "/dashboard"), ("Students", "/students"), ("Users", "/users")]);
}

#[test]
fn tester_sees_results() {
    let links = nav_links(&session_with(&["TESTER"]));
    assert_eq!(links, vec![("Dashboard", "/dashboard"), ("Students", "/students"), ("Results", "/tester-results")]);
}
