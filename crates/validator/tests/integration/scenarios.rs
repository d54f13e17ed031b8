//! Whole-form scenarios driven through the public chain API.

use formcheck_validator::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn closed_gate_empties_value_before_required() {
    let mut form = FormValidator::new([("a", "x"), ("b", "1")]);

    form.field("b").when(Condition::equals("a", "y")).required();

    assert_eq!(form.value("b"), Some(&FieldValue::Empty));
    assert_eq!(form.errors("b"), ["This field is required"]);
    assert!(!form.is_valid());
    assert!(!form.is_group_valid());
}

#[test]
fn containment_against_literal_list() {
    let mut form = FormValidator::new([("color", "blue")]);
    assert!(form.field("color").is_in(["red", "green", "blue"]).is_valid());

    assert!(!form.field("color").is_in(["red", "green"]).is_valid());
    assert_eq!(form.first_error("color"), "Value is not in");
}

#[test]
fn selection_alone_does_not_change_value() {
    let mut form = FormValidator::new([("email", " a@b.com ")]);
    let chain = form.field("email");
    assert_eq!(chain.value(), &FieldValue::from("a@b.com"));
    assert_eq!(form.current_value(), Some(&FieldValue::from("a@b.com")));
}

#[test]
fn registration_form() {
    let mut form = FormValidator::new([
        ("user_name", "ferris"),
        ("email", "Ferris@Example.com"),
        ("password", "hunter22"),
        ("password_again", "hunter22"),
        ("age", "17"),
        ("country", "hu"),
        ("website", "example.com"),
        ("bio", ""),
    ]);

    form.field("user_name").required().alpha().min_size(3).max_size(20);
    form.field("email").required().email().to_lower();
    form.field("password").required().min_size(8);
    form.field("password_again").required().equal(Operand::field("password"));
    form.field("age").required().integer().min_value(18.0);
    form.field("country").one_of(["DE", "HU", "AT"]).to_upper();
    form.field("website").url().esc_url();
    form.field("bio").max_size(200).esc_html();

    assert!(!form.is_group_valid());
    assert_eq!(form.all_errors(), ["Please enter a value greater than 18", "Please enter a valid url"]);
    assert_eq!(form.value("email").and_then(FieldValue::as_text), Some("ferris@example.com"));
    assert_eq!(form.value("country").and_then(FieldValue::as_text), Some("HU"));
    assert_eq!(form.value("website").and_then(FieldValue::as_text), Some("http://example.com"));
    assert_eq!(form.value("bio"), Some(&FieldValue::from("")));
}

#[test]
fn optional_fields_pass_when_empty() {
    let mut form = FormValidator::new([("phone", "")]);
    let valid = form
        .field("phone")
        .integer()
        .min_size(6)
        .matches(r"^\+?[0-9 ]+$")
        .is_in(["never"])
        .is_valid();
    assert!(valid);
    assert!(form.is_group_valid());
}

#[test]
fn chain_keeps_running_after_failure() {
    let mut form = FormValidator::new([("code", "ab")]);
    form.field("code").integer().min_size(3).to_upper();

    assert_eq!(
        form.errors_joined("code", " / "),
        "Only numbers are permitted / Please enter more than 3 characters"
    );
    assert_eq!(form.value("code").and_then(FieldValue::as_text), Some("AB"));
}

#[test]
fn multi_value_fields() {
    let mut form = FormValidator::new([(
        "tags",
        FieldValue::from(vec!["rust", "crab", "rust"]),
    )]);

    form.field("tags")
        .min_size(2)
        .alpha()
        .is_in("crab")
        .is_in(vec!["rust", "crab"])
        .equal(3usize);
    assert!(form.is_group_valid());

    form.field("tags").one_of(["rust"]);
    assert_eq!(form.first_error("tags"), "Please choose one of \" rust \"");
}

#[test]
fn convert_date_then_validate_new_format() {
    let mut form = FormValidator::new([("born", "31.12.1999"), ("meeting", "2024-01-01 10:00:00")]);

    form.field("born")
        .convert_date("de_date", "iso_date", None)
        .datetime("iso_date");
    form.field("meeting").convert_date("iso", "iso", Some("Mars/Olympus")).required();

    assert_eq!(form.value("born").and_then(FieldValue::as_text), Some("1999-12-31"));
    assert_eq!(
        form.errors("meeting"),
        ["The supplied timezone [Mars/Olympus] is not supported."]
    );
    assert_eq!(form.value("meeting"), Some(&FieldValue::Empty));
}

#[test]
fn custom_rule_through_check() {
    struct Even;

    impl Rule for Even {
        fn code(&self) -> &'static str {
            "even"
        }

        fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
            let even = value
                .as_text()
                .and_then(|s| s.parse::<i64>().ok())
                .is_some_and(|n| n % 2 == 0);
            Verdict::check(even, || ValidationError::new("even", "Must be even"))
        }
    }

    let mut form = FormValidator::builder()
        .message("even", "Pick an even number, not {value}")
        .build([("n", "3"), ("m", "3")]);

    form.field("n").check(Even);
    form.field("m").check(Even.message("odd!"));

    // No {value} parameter: the placeholder stays as written.
    assert_eq!(form.first_error("n"), "Pick an even number, not {value}");
    assert_eq!(form.first_error("m"), "odd!");
}

#[test]
fn invalid_regex_is_a_field_error() {
    let mut form = FormValidator::new([("x", "abc")]);
    let chain = form.field("x").matches("([a-z]").alpha();
    assert!(!chain.is_valid());
    assert_eq!(chain.errors().len(), 1);
    assert!(chain.first_error().starts_with("invalid pattern `([a-z]`"));
}
