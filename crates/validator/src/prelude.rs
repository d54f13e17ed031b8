//! Prelude module for convenient imports.
//!
//! Provides a single `use formcheck_validator::prelude::*;` import that
//! brings in the engine, the rule contract, every built-in rule and the
//! transforms.

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::engine::{
    Comparator, Condition, FieldChain, FieldRecord, FormValidator, FormValidatorBuilder,
    GroupErrors,
};

// ============================================================================
// FOUNDATION: Values, rule contract, errors, messages
// ============================================================================

pub use crate::foundation::{
    FieldValue, FormError, MapText, MessageCatalog, Rule, RuleContext, RuleError, RuleExt,
    Transform, ValidationError, Verdict, WithMessage,
};

// ============================================================================
// RULES: All built-in rules
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::rules::*;

// ============================================================================
// TRANSFORMS
// ============================================================================

pub use crate::transforms::{
    Capitalize, Lowercase, Sanitizer, Sanitizers, TitleCase, Trim, Uppercase,
};
