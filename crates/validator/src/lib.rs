//! # formcheck-validator
//!
//! A fluent, stateful validator for key/value form submissions.
//!
//! ## Quick Start
//!
//! ```rust
//! use formcheck_validator::prelude::*;
//!
//! let mut form = FormValidator::new([
//!     ("email", " ferris@example.com "),
//!     ("age", "7"),
//!     ("newsletter", ""),
//! ]);
//!
//! form.field("email").required().email().to_lower();
//! form.field("age").required().integer().min_value(18.0);
//! form.field("newsletter").boolean();
//!
//! assert!(!form.is_group_valid());
//! assert_eq!(form.first_error("age"), "Please enter a value greater than 18");
//! assert!(form.errors("newsletter").is_empty());
//! ```
//!
//! ## How a chain runs
//!
//! [`FormValidator::field`] moves the cursor and returns a [`FieldChain`].
//! Each rule on the chain is skipped while the value is empty, except
//! [`required`](rules::Required), which runs only while the chain is still
//! valid. A failing rule marks the chain and the whole group invalid and
//! records one message against the field. A [`Condition`] gate empties the
//! value instead of failing, so the rest of the chain becomes a no-op.
//!
//! ## Writing Rules
//!
//! Use the [`rule!`] macro for text predicates, or implement
//! [`Rule`](foundation::Rule) for anything that needs the whole value or
//! other fields.
//!
//! ## Built-in Rules
//!
//! - **Presence**: [`Required`](rules::Required)
//! - **Format**: [`Email`](rules::Email), [`Url`](rules::Url), [`Alpha`](rules::Alpha),
//!   [`Text`](rules::Text), [`Matches`](rules::Matches), [`Chars`](rules::Chars),
//!   [`Ip`](rules::Ip)
//! - **Size**: [`MinSize`](rules::MinSize), [`MaxSize`](rules::MaxSize)
//! - **Numeric**: [`Integer`](rules::Integer), [`Float`](rules::Float),
//!   [`Number`](rules::Number), [`Boolean`](rules::Boolean),
//!   [`MinValue`](rules::MinValue), [`MaxValue`](rules::MaxValue)
//! - **Sets**: [`OneOf`](rules::OneOf), [`Equal`](rules::Equal), [`IsIn`](rules::IsIn)
//! - **Dates**: [`DateTime`](rules::DateTime), [`ConvertDate`](rules::ConvertDate)
//! - **Custom**: [`Callback`](rules::Callback)

pub mod engine;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod rules;
pub mod transforms;

pub use engine::{
    Comparator, Condition, FieldChain, FieldRecord, FormValidator, FormValidatorBuilder,
    GroupErrors,
};
pub use foundation::{FieldValue, FormError, MessageCatalog, RuleError, ValidationError};
