//! Macros for declaring text rules with minimal boilerplate.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formcheck_validator::rule;
//!
//! // Unit rule (no parameters)
//! rule! {
//!     pub Digits => "digits";
//!     text(input) { input.chars().all(|c| c.is_ascii_digit()) }
//!     fn digits();
//! }
//!
//! // Rule with parameters feeding the message template
//! rule! {
//!     pub Prefix { prefix: String } => "prefix";
//!     text(self, input) { input.starts_with(&self.prefix) }
//!     error(self) { ValidationError::code("prefix").with_param("prefix", &self.prefix) }
//!     fn prefix(prefix: String);
//! }
//! ```

/// Declares a text rule: struct definition, [`Rule`](crate::foundation::Rule)
/// implementation and an optional factory function.
///
/// The predicate is evaluated against every text leaf of the field value, so a
/// multi-value field passes only if each of its entries passes. Failures are
/// reported under the given code; parameterised rules supply an `error` block
/// to attach template parameters.
///
/// `#[derive(Debug, Clone)]` is always applied. Add extra derives via `#[derive(...)]`.
#[macro_export]
macro_rules! rule {
    // ── Unit rule (no fields), optional factory ─────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident => $code:literal;
        text($inp:ident) $rule:block
        $(fn $factory:ident();)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name;

        impl $crate::foundation::Rule for $name {
            fn code(&self) -> &'static str {
                $code
            }

            fn evaluate(
                &self,
                value: &$crate::foundation::FieldValue,
                _ctx: &$crate::foundation::RuleContext<'_>,
            ) -> $crate::foundation::Verdict {
                $crate::foundation::Verdict::check(
                    value.all_text(&mut |$inp: &str| $rule),
                    || $crate::foundation::ValidationError::code($code),
                )
            }
        }

        $(
            #[must_use]
            $vis const fn $factory() -> $name {
                $name
            }
        )?
    };

    // ── Struct with fields, custom error, optional factory ──────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } => $code:literal;
        text($self_:ident, $inp:ident) $rule:block
        error($self2:ident) $err:block
        $(fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            #[must_use]
            pub fn new($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl $crate::foundation::Rule for $name {
            fn code(&self) -> &'static str {
                $code
            }

            #[allow(unused_variables)]
            fn evaluate(
                &$self_,
                value: &$crate::foundation::FieldValue,
                _ctx: &$crate::foundation::RuleContext<'_>,
            ) -> $crate::foundation::Verdict {
                $crate::foundation::Verdict::check(
                    value.all_text(&mut |$inp: &str| $rule),
                    || $err,
                )
            }
        }

        $(
            #[must_use]
            $vis fn $factory($($farg: $faty),*) -> $name {
                $name::new($($farg),*)
            }
        )?
    };
}
