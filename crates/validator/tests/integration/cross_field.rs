//! Rules and gates that read other fields.

use formcheck_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(Comparator::Equal, "5", false)]
#[case(Comparator::NotEqual, "5", true)]
#[case(Comparator::Less, "10", true)]
#[case(Comparator::Greater, "10", false)]
#[case(Comparator::LessOrEqual, "9", true)]
#[case(Comparator::GreaterOrEqual, "9", true)]
#[case(Comparator::Exists, "", true)]
fn gate_comparators_against_numeric_field(
    #[case] comparator: Comparator,
    #[case] expected: &str,
    #[case] open: bool,
) {
    let mut form = FormValidator::new([("count", "9"), ("target", "keep")]);
    form.field("target")
        .when(Condition::new("count", expected, comparator));
    let kept = form.value("target") == Some(&FieldValue::from("keep"));
    assert_eq!(kept, open);
    assert!(form.is_group_valid());
}

#[test]
fn gate_with_several_checks_needs_all() {
    let mut form = FormValidator::new([
        ("country", "HU"),
        ("newsletter", "yes"),
        ("zip", "abc"),
    ]);

    form.field("zip")
        .when(Condition::equals("country", "HU").and("newsletter", "yes"))
        .integer();
    assert_eq!(form.errors("zip"), ["Only numbers are permitted"]);

    form.field("zip")
        .when(Condition::equals("country", "HU").and("newsletter", "no"))
        .integer();
    assert_eq!(form.errors("zip").len(), 1);
    assert_eq!(form.value("zip"), Some(&FieldValue::Empty));
}

#[test]
fn gate_on_unknown_field_closes() {
    let mut form = FormValidator::new([("x", "value")]);
    form.field("x").when(Condition::exists("nowhere")).required();
    assert_eq!(form.first_error("x"), "This field is required");
}

#[test]
fn gate_sees_lazily_created_fields() {
    let mut form = FormValidator::new([("x", "value")]);
    form.field("created_later");
    form.field("x").when(Condition::exists("created_later"));
    assert_eq!(form.value("x"), Some(&FieldValue::from("value")));
}

#[test]
fn equal_follows_current_value_of_other_field() {
    let mut form = FormValidator::new([("email", "A@B.COM"), ("confirm", "a@b.com")]);
    form.field("email").to_lower();
    assert!(form.field("confirm").equal(Operand::field("email")).is_valid());
}

#[test]
fn is_in_other_field_list() {
    let mut form = FormValidator::new([
        ("allowed", FieldValue::from(vec!["admin", "editor"])),
        ("role", FieldValue::from("editor")),
        ("other", FieldValue::from("guest")),
    ]);
    assert!(form.field("role").is_in(Operand::field("allowed")).is_valid());
    assert!(!form.field("other").is_in(Operand::field("allowed")).is_valid());
}

#[test]
fn literal_text_is_never_taken_as_field_name() {
    let mut form = FormValidator::new([("password", "secret"), ("again", "password")]);
    assert!(form.field("again").equal("password").is_valid());
    assert!(!form.field("again").equal(Operand::field("password")).is_valid());
}

fn sequences_with_blank_leaves() -> [(&'static str, FieldValue); 3] {
    [
        ("flat", FieldValue::from(vec!["x", ""])),
        ("nested", FieldValue::from(vec![vec!["x", ""]])),
        ("map", [("a", "x"), ("b", "")].into_iter().collect()),
    ]
}

#[rstest]
#[case("flat")]
#[case("nested")]
#[case("map")]
fn is_in_unknown_field_fails_for_sequences(#[case] name: &str) {
    let mut form = FormValidator::new(sequences_with_blank_leaves());
    assert!(!form.field(name).is_in(Operand::field("missing")).is_valid());
    assert_eq!(form.errors(name), ["Value is not in"]);
}

#[rstest]
#[case("flat")]
#[case("nested")]
#[case("map")]
fn equal_unknown_field_fails_for_sequences(#[case] name: &str) {
    let mut form = FormValidator::new(sequences_with_blank_leaves());
    assert!(!form.field(name).equal(Operand::field("missing")).is_valid());
    assert_eq!(form.errors(name).len(), 1);
}

#[test]
fn is_in_list_needs_the_operand_list_to_exist() {
    let mut form = FormValidator::new([
        ("roles", FieldValue::from(vec!["admin", ""])),
        ("granted", FieldValue::from(vec!["admin"])),
    ]);
    assert!(form.field("roles").is_in(Operand::field("granted")).is_valid());

    assert!(!form.field("roles").is_in(Operand::field("revoked")).is_valid());
    assert_eq!(form.first_error("roles"), "Value is not in");
}
