//! Building blocks shared by the engine and the rule library
//!
//! - **Values**: [`FieldValue`]
//! - **Contract**: [`Rule`], [`Verdict`], [`RuleContext`], [`Transform`]
//! - **Errors**: [`ValidationError`] (a verdict), [`RuleError`] and [`FormError`]
//! - **Messages**: [`MessageCatalog`]

pub mod error;
pub mod messages;
pub mod traits;
pub mod value;

pub use error::{FormError, RuleError, ValidationError};
pub use messages::MessageCatalog;
pub use traits::{MapText, Rule, RuleContext, RuleExt, Transform, Verdict, WithMessage};
pub use value::FieldValue;
