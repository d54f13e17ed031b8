//! Report rendering.

use std::io::{self, Write};

use formcheck_validator::{FieldValue, FormValidator, MessageCatalog};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::ReportFormat;

/// JSON shape of a `check` report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Whether every rule passed
    pub valid: bool,
    /// Errors nested by field name
    pub errors: serde_json::Value,
    /// Field values after transforms and sanitizers
    pub values: IndexMap<&'a str, &'a FieldValue>,
}

impl<'a> Report<'a> {
    pub fn new(form: &'a FormValidator) -> Self {
        Self {
            valid: form.is_group_valid(),
            errors: form.group_errors().to_json(),
            values: form.fields().map(|record| (record.name(), record.value())).collect(),
        }
    }
}

/// Writes the result of `check`.
pub fn write_report<W: Write>(
    out: &mut W,
    form: &FormValidator,
    format: ReportFormat,
    joiner: &str,
) -> io::Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &Report::new(form))?;
            writeln!(out)
        }
        ReportFormat::Text => {
            let errors = form.group_errors();
            for (field, messages) in errors.iter() {
                writeln!(out, "{field}: {}", messages.join(joiner))?;
            }
            if errors.is_empty() {
                writeln!(out, "valid")
            } else {
                let noun = if errors.len() == 1 { "field" } else { "fields" };
                writeln!(out, "invalid: {} {noun} failed", errors.len())
            }
        }
    }
}

/// Writes the message catalog.
pub fn write_catalog<W: Write>(
    out: &mut W,
    catalog: &MessageCatalog,
    format: ReportFormat,
) -> io::Result<()> {
    match format {
        ReportFormat::Json => {
            let table: IndexMap<&str, &str> = catalog.iter().collect();
            serde_json::to_writer_pretty(&mut *out, &table)?;
            writeln!(out)
        }
        ReportFormat::Text => {
            let width = catalog.iter().map(|(code, _)| code.len()).max().unwrap_or(0);
            for (code, template) in catalog.iter() {
                writeln!(out, "{code:<width$}  {template}")?;
            }
            Ok(())
        }
    }
}
