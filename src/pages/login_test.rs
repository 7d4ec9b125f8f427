use super::*;

#[test]
fn email_shape_requires_local_part_and_domain() {
    assert!(looks_like_email("a@b.com"));
    assert!(!looks_like_email("a@"));
    assert!(!looks_like_email("@b.com"));
    assert!(!looks_like_email("ab.com"));
    assert!(!looks_like_email("a b@c.com"));
}

#[test]
fn login_input_trims_email_and_keeps_password_verbatim() {
    assert_eq!(
        validate_login_input("  user@example.com ", " secret "),
        Ok(LoginRequest { email: "user@example.com".to_owned(), password: " secret ".to_owned() })
    );
}

#[test]
fn login_input_rejects_bad_email_first() {
    assert_eq!(validate_login_input("nope", ""), Err(INVALID_EMAIL));
}

#[test]
fn login_input_requires_password() {
    assert_eq!(validate_login_input("user@example.com", ""), Err(MISSING_PASSWORD));
}
