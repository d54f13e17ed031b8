//! Error reporting across fields.

use formcheck_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn failed_form() -> FormValidator {
    let mut form = FormValidator::new([
        ("name", ""),
        ("address[city]", ""),
        ("address[zip]", "12a"),
        ("ok", "fine"),
    ]);
    form.field("name").required().min_size(2);
    form.field("address[city]").required();
    form.field("address[zip]").integer().max_size(2);
    form.field("ok").required();
    form
}

#[test]
fn all_errors_in_field_then_message_order() {
    let form = failed_form();
    assert_eq!(
        form.all_errors(),
        [
            "This field is required",
            "This field is required",
            "Only numbers are permitted",
            "Please enter less than 2 characters",
        ]
    );
    assert_eq!(form.all_errors_joined("\n").lines().count(), 4);
}

#[test]
fn flatten_paths() {
    let form = failed_form();
    let paths: Vec<String> = form.group_errors().flatten().map(|(path, _)| path).collect();
    assert_eq!(paths, ["name.0", "address[city].0", "address[zip].0", "address[zip].1"]);
}

#[test]
fn nested_json_report() {
    assert_eq!(
        failed_form().group_errors().to_json(),
        json!({
            "name": ["This field is required"],
            "address": {
                "city": ["This field is required"],
                "zip": ["Only numbers are permitted", "Please enter less than 2 characters"],
            },
        })
    );
}

#[test]
fn field_records_expose_state() {
    let form = failed_form();
    let failing: Vec<&str> = form
        .fields()
        .filter(|record| !record.errors().is_empty())
        .map(FieldRecord::name)
        .collect();
    assert_eq!(failing, ["name", "address[city]", "address[zip]"]);
}

#[test]
fn untouched_fields_are_unaffected() {
    let mut form = FormValidator::new([("a", " keep "), ("b", "")]);
    form.field("b").required();
    assert_eq!(form.value("a"), Some(&FieldValue::from("keep")));
    assert!(form.errors("a").is_empty());
}
