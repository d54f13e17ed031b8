//! End-to-end tests for formcheck-validator.

mod cross_field;
mod reporting;
mod scenarios;
