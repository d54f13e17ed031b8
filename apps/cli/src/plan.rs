//! Declarative rule plans.
//!
//! A plan is an ordered list of fields, each with the steps to run on it:
//!
//! ```toml
//! [[fields]]
//! field = "email"
//! rules = [
//!     { rule = "required", message = "Tell us where to write" },
//!     { rule = "email" },
//!     { rule = "to_lower" },
//! ]
//! ```
//!
//! Steps run in order on one chain per field, exactly as the equivalent
//! method calls would.

use std::path::Path;

use anyhow::{Context, Result, bail};
use formcheck_validator::foundation::{Rule, WithMessage};
use formcheck_validator::rules::{self, CharClass, IpVersion, Operand};
use formcheck_validator::transforms::{Capitalize, Lowercase, Sanitizer, TitleCase, Trim, Uppercase};
use formcheck_validator::{Comparator, Condition, FieldChain, FieldValue, FormValidator};
use serde::Deserialize;

/// A parsed rule plan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Fields in the order their chains run
    #[serde(default)]
    pub fields: Vec<FieldPlan>,
}

/// Steps for one field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldPlan {
    /// Field to select
    pub field: String,
    /// Steps, in order
    #[serde(default)]
    pub rules: Vec<Step>,
}

/// One step of a chain, with an optional message override.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub kind: StepKind,
    /// Replaces the default message when a rule fails; ignored by transforms
    #[serde(default)]
    pub message: Option<String>,
}

/// Every rule, transform, sanitizer and gate a plan can name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum StepKind {
    // Rules
    Required,
    Email,
    Url,
    Alpha,
    Text,
    MinSize { size: usize },
    MaxSize { size: usize },
    Integer,
    Float,
    Number,
    Boolean,
    MinValue { min: f64 },
    MaxValue { max: f64 },
    OneOf { items: Vec<String> },
    Equal(OperandSpec),
    IsIn(OperandSpec),
    Matches { pattern: String },
    Chars { classes: Vec<CharClass> },
    Ip {
        #[serde(default)]
        version: IpVersion,
    },
    Datetime { format: String },
    ConvertDate {
        input: String,
        output: String,
        timezone: Option<String>,
    },

    // Transforms
    ToLower,
    ToUpper,
    ToTitle,
    ToCapital,
    Trim,

    // Sanitizers
    EscAttr,
    EscHtml,
    EscJs,
    EscTextarea,
    EscUrl,
    SanitizeTextField,
    SanitizeTitle,
    SanitizeEmail,
    SanitizeHtmlClass,
    SanitizeUrl,

    // Gate
    When(GateSpec),
}

/// Right-hand side of `equal` and `is_in`. Exactly one key must be set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperandSpec {
    /// Name of another field
    pub field: Option<String>,
    /// Literal text, number or list
    pub value: Option<serde_json::Value>,
    /// Character or element count
    pub length: Option<usize>,
}

/// Gate: the field is emptied unless every check holds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateSpec {
    /// Shorthand for a single check
    pub field: Option<String>,
    /// Expected value of the shorthand check
    pub value: Option<serde_json::Value>,
    /// Additional `{ field, value }` checks
    #[serde(default)]
    pub checks: Vec<GateCheck>,
    /// How stored values compare to the expected ones
    #[serde(default)]
    pub comparator: Comparator,
}

/// One `field <comparator> value` check of a gate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateCheck {
    pub field: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

// ============================================================================
// LOADING
// ============================================================================

impl Plan {
    /// Reads a plan, choosing the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule plan {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let plan = match extension.as_deref() {
            Some("toml") => Self::from_toml(&text),
            Some("yaml" | "yml") => Self::from_yaml(&text),
            Some("json") => Self::from_json(&text),
            _ => bail!(
                "unsupported rule plan {}: expected a .toml, .yaml, .yml or .json file",
                path.display()
            ),
        };
        plan.with_context(|| format!("invalid rule plan {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let plan: Self = toml::from_str(text)?;
        plan.verified()
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let plan: Self = serde_yaml::from_str(text)?;
        plan.verified()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let plan: Self = serde_json::from_str(text)?;
        plan.verified()
    }

    /// Rejects steps whose parameters cannot be turned into engine values.
    fn verified(self) -> Result<Self> {
        for field in &self.fields {
            for (position, step) in field.rules.iter().enumerate() {
                let checked = match &step.kind {
                    StepKind::Equal(operand) | StepKind::IsIn(operand) => operand.to_operand().map(drop),
                    StepKind::When(gate) => gate.to_condition().map(drop),
                    _ => Ok(()),
                };
                checked.with_context(|| {
                    format!("field `{}`, step {}", field.field, position + 1)
                })?;
            }
        }
        Ok(self)
    }

    /// Runs every field chain of the plan against `form`.
    pub fn apply(&self, form: &mut FormValidator) -> Result<()> {
        for field in &self.fields {
            tracing::debug!(field = %field.field, steps = field.rules.len(), "running chain");
            let mut chain = form.field(&field.field);
            for step in &field.rules {
                chain = step.apply(chain)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// APPLYING
// ============================================================================

impl Step {
    /// Applies this step to the chain.
    pub fn apply<'a>(&self, chain: FieldChain<'a>) -> Result<FieldChain<'a>> {
        let chain = match &self.kind {
            StepKind::Required => self.check(chain, rules::required()),
            StepKind::Email => self.check(chain, rules::email()),
            StepKind::Url => self.check(chain, rules::url()),
            StepKind::Alpha => self.check(chain, rules::alpha()),
            StepKind::Text => self.check(chain, rules::text()),
            StepKind::MinSize { size } => self.check(chain, rules::min_size(*size)),
            StepKind::MaxSize { size } => self.check(chain, rules::max_size(*size)),
            StepKind::Integer => self.check(chain, rules::integer()),
            StepKind::Float => self.check(chain, rules::float()),
            StepKind::Number => self.check(chain, rules::number()),
            StepKind::Boolean => self.check(chain, rules::boolean()),
            StepKind::MinValue { min } => self.check(chain, rules::min_value(*min)),
            StepKind::MaxValue { max } => self.check(chain, rules::max_value(*max)),
            StepKind::OneOf { items } => self.check(chain, rules::one_of(items.iter().cloned())),
            StepKind::Equal(operand) => self.check(chain, rules::equal(operand.to_operand()?)),
            StepKind::IsIn(operand) => self.check(chain, rules::is_in(operand.to_operand()?)),
            StepKind::Matches { pattern } => self.check(chain, rules::matches(pattern)),
            StepKind::Chars { classes } => self.check(chain, rules::chars(classes.iter().copied())),
            StepKind::Ip { version } => self.check(chain, rules::ip(*version)),
            StepKind::Datetime { format } => self.check(chain, rules::datetime(format)),
            StepKind::ConvertDate {
                input,
                output,
                timezone,
            } => self.check(chain, rules::convert_date(input, output, timezone.as_deref())),

            StepKind::ToLower => chain.transform(Lowercase),
            StepKind::ToUpper => chain.transform(Uppercase),
            StepKind::ToTitle => chain.transform(TitleCase),
            StepKind::ToCapital => chain.transform(Capitalize),
            StepKind::Trim => chain.transform(Trim),

            StepKind::EscAttr => chain.sanitize(Sanitizer::EscAttr),
            StepKind::EscHtml => chain.sanitize(Sanitizer::EscHtml),
            StepKind::EscJs => chain.sanitize(Sanitizer::EscJs),
            StepKind::EscTextarea => chain.sanitize(Sanitizer::EscTextarea),
            StepKind::EscUrl => chain.sanitize(Sanitizer::EscUrl),
            StepKind::SanitizeTextField => chain.sanitize(Sanitizer::SanitizeText),
            StepKind::SanitizeTitle => chain.sanitize(Sanitizer::SanitizeTitle),
            StepKind::SanitizeEmail => chain.sanitize(Sanitizer::SanitizeEmail),
            StepKind::SanitizeHtmlClass => chain.sanitize(Sanitizer::SanitizeHtmlClass),
            StepKind::SanitizeUrl => chain.sanitize(Sanitizer::SanitizeUrl),

            StepKind::When(gate) => chain.when(gate.to_condition()?),
        };
        Ok(chain)
    }

    fn check<'a, R: Rule>(&self, chain: FieldChain<'a>, rule: R) -> FieldChain<'a> {
        match &self.message {
            Some(message) => chain.check(WithMessage::new(rule, message.as_str())),
            None => chain.check(rule),
        }
    }
}

impl OperandSpec {
    /// Builds the engine operand.
    pub fn to_operand(&self) -> Result<Operand> {
        match (&self.field, &self.value, self.length) {
            (Some(field), None, None) => Ok(Operand::field(field.as_str())),
            (None, Some(value), None) => Ok(Operand::Value(FieldValue::from(value.clone()))),
            (None, None, Some(length)) => Ok(Operand::Length(length)),
            (None, None, None) => bail!("expected one of `field`, `value` or `length`"),
            _ => bail!("`field`, `value` and `length` are mutually exclusive"),
        }
    }
}

impl GateSpec {
    /// Builds the engine condition.
    pub fn to_condition(&self) -> Result<Condition> {
        let mut checks = self
            .field
            .iter()
            .map(|field| (field.as_str(), self.value.as_ref()))
            .chain(self.checks.iter().map(|check| (check.field.as_str(), check.value.as_ref())));

        let Some((field, value)) = checks.next() else {
            bail!("a gate needs `field` or at least one entry in `checks`");
        };
        if self.field.is_none() && self.value.is_some() {
            bail!("gate `value` given without `field`");
        }

        let mut condition = Condition::new(field, expected_text(value), self.comparator);
        for (field, value) in checks {
            condition = condition.and(field, expected_text(value));
        }
        Ok(condition)
    }
}

/// Expected values may be written as numbers or booleans in the plan.
fn expected_text(value: Option<&serde_json::Value>) -> String {
    match value.cloned().map(FieldValue::from) {
        Some(FieldValue::Text(text)) => text,
        Some(other) => serde_json::to_string(&other).unwrap_or_default(),
        None => String::new(),
    }
}
