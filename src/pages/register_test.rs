use super::*;

#[test]
fn register_input_trims_name_and_email() {
    assert_eq!(
        validate_register_input("  Ada Lovelace ", " ada@example.com", "pw"),
        Ok(RegisterRequest {
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "pw".to_owned(),
        })
    );
}

#[test]
fn register_input_checks_fields_in_form_order() {
    assert_eq!(validate_register_input("", "bad", ""), Err(MISSING_NAME));
    assert_eq!(validate_register_input("Ada", "bad", ""), Err(INVALID_EMAIL));
    assert_eq!(validate_register_input("Ada", "ada@example.com", ""), Err(MISSING_PASSWORD));
}
