//! Date and time rules
//!
//! Formats may be given as a named preset (`iso`, `de_date`, ...), as a
//! chrono `strftime` string (`%Y-%m-%d`) or with PHP-style letters
//! (`Y-m-d H:i:s`). Validation is strict: the value must parse with the
//! format and reformat to exactly the same text.
//!
//! Components missing from the input format default to midnight and to
//! 1970-01-01, so converting between formats is deterministic.

use std::fmt::Write;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::foundation::{FieldValue, Rule, RuleContext, RuleError, ValidationError, Verdict};

// ============================================================================
// FORMATS
// ============================================================================

/// Default format of [`DateTime`]: `Y-m-d H:i:s`.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolves a named preset to its chrono format.
#[must_use]
pub fn preset(name: &str) -> Option<&'static str> {
    let format = match name {
        "us" | "en_US" => "%m/%d/%Y %H:%M:%S",
        "us_date" | "en_US_date" => "%m/%d/%Y",
        "de" | "de_DE" | "deutsch" => "%d.%m.%Y %H:%M:%S",
        "de_date" | "de_DE_date" | "deutsch_datum" => "%d.%m.%Y",
        "hu" | "hu_HU" | "magyar" => "%Y.%m.%d %H:%M:%S",
        "hu_date" | "hu_HU_date" | "magyar_datum" => "%Y.%m.%d",
        "iso" => DEFAULT_FORMAT,
        "iso_date" => "%Y-%m-%d",
        "time" => "%H:%M:%S",
        _ => return None,
    };
    Some(format)
}

/// Converts PHP `date()` letters into chrono specifiers.
///
/// Unknown letters are copied literally and `\` escapes the next character.
#[must_use]
pub fn php_format_to_chrono(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        let spec = match c {
            'd' => "%d",
            'j' => "%-d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'z' => "%j",
            'm' => "%m",
            'n' => "%-m",
            'M' => "%b",
            'F' => "%B",
            'Y' => "%Y",
            'y' => "%y",
            'H' => "%H",
            'G' => "%-H",
            'h' => "%I",
            'g' => "%-I",
            'i' => "%M",
            's' => "%S",
            'A' => "%p",
            'a' => "%P",
            'P' => "%:z",
            'O' => "%z",
            'U' => "%s",
            '%' => "%%",
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, escaped);
                }
                continue;
            }
            other => {
                push_literal(&mut out, other);
                continue;
            }
        };
        out.push_str(spec);
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// A resolved date format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    chrono: String,
}

impl DateFormat {
    /// Resolves a preset name, chrono format or PHP-style format.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidDateFormat`] if the format contains no
    /// date or time field at all.
    pub fn parse(format: &str) -> Result<Self, RuleError> {
        let chrono = if let Some(preset) = preset(format) {
            preset.to_owned()
        } else if format.contains('%') {
            format.to_owned()
        } else {
            php_format_to_chrono(format)
        };

        if !has_field(&chrono) {
            return Err(RuleError::InvalidDateFormat(format.to_owned()));
        }

        Ok(Self {
            source: format.to_owned(),
            chrono,
        })
    }

    /// The format as given by the caller.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The equivalent chrono format string.
    #[must_use]
    pub fn as_chrono(&self) -> &str {
        &self.chrono
    }

    /// Parses `input` strictly: it must reformat to the same text.
    #[must_use]
    pub fn parse_strict(&self, input: &str) -> Option<NaiveDateTime> {
        let parsed = parse_loose(input, &self.chrono)?;
        let again = self.format(parsed, None)?;
        (again == input).then_some(parsed)
    }

    /// Formats a timestamp, attaching `offset` (UTC when `None`).
    ///
    /// Returns `None` when the format cannot render the value.
    #[must_use]
    pub fn format(&self, value: NaiveDateTime, offset: Option<FixedOffset>) -> Option<String> {
        let offset = offset.or_else(|| FixedOffset::east_opt(0))?;
        let stamped = offset.from_local_datetime(&value).single()?;
        let mut out = String::new();
        write!(out, "{}", stamped.format(&self.chrono)).ok()?;
        Some(out)
    }
}

fn has_field(chrono: &str) -> bool {
    let mut chars = chrono.chars();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next().is_some_and(|next| next != '%') {
            return true;
        }
    }
    false
}

fn parse_loose(input: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
        return Some(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, format) {
        return Some(date.and_time(NaiveTime::MIN));
    }
    let time = NaiveTime::parse_from_str(input, format).ok()?;
    NaiveDate::from_ymd_opt(1970, 1, 1).map(|epoch| epoch.and_time(time))
}

// ============================================================================
// TIMEZONES
// ============================================================================

/// Parses `UTC`, `GMT`, `Z` or a fixed `±HH:MM` / `±HHMM` offset.
///
/// # Errors
///
/// Returns [`RuleError::UnsupportedTimezone`] for anything else, including
/// IANA zone names.
pub fn parse_timezone(name: &str) -> Result<FixedOffset, RuleError> {
    let unsupported = || RuleError::UnsupportedTimezone(name.to_owned());
    let trimmed = name.trim();

    if ["utc", "gmt", "z"].contains(&trimmed.to_ascii_lowercase().as_str()) {
        return FixedOffset::east_opt(0).ok_or_else(unsupported);
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(unsupported()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) || rest.len() > 5 {
        return Err(unsupported());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| unsupported())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| unsupported())?;
    if hours > 14 || minutes > 59 {
        return Err(unsupported());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(unsupported)
}

// ============================================================================
// RULES
// ============================================================================

/// Value must be a date in the given format.
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("born", "31.12.1999"), ("bad", "31.02.1999")]);
/// assert!(form.field("born").datetime("de_date").is_valid());
/// assert!(!form.field("bad").datetime("de_date").is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct DateTime {
    format: Result<DateFormat, RuleError>,
}

impl DateTime {
    /// Creates the rule from a preset, chrono or PHP-style format.
    #[must_use]
    pub fn new(format: &str) -> Self {
        Self {
            format: DateFormat::parse(format),
        }
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl Rule for DateTime {
    fn code(&self) -> &'static str {
        "date"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        match &self.format {
            Ok(format) => Verdict::check(
                value.all_text(&mut |s| format.parse_strict(s).is_some()),
                || ValidationError::code("date").with_param("format", format.source()),
            ),
            Err(err) => Verdict::fail(err.clone()),
        }
    }
}

/// Creates a [`DateTime`] rule.
#[must_use]
pub fn datetime(format: &str) -> DateTime {
    DateTime::new(format)
}

/// Validates a date, then rewrites it into another format.
///
/// An unsupported timezone empties the value and reports `date_timezone`,
/// which turns the rest of the chain into no-ops.
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("day", "12/31/1999")]);
/// form.field("day").convert_date("us_date", "iso_date", None);
/// assert_eq!(form.value("day").and_then(FieldValue::as_text), Some("1999-12-31"));
/// ```
#[derive(Debug, Clone)]
pub struct ConvertDate {
    input: Result<DateFormat, RuleError>,
    output: Result<DateFormat, RuleError>,
    timezone: Option<Result<FixedOffset, RuleError>>,
}

impl ConvertDate {
    /// Creates the rule. `timezone` is attached when formatting the output.
    #[must_use]
    pub fn new(input: &str, output: &str, timezone: Option<&str>) -> Self {
        Self {
            input: DateFormat::parse(input),
            output: DateFormat::parse(output),
            timezone: timezone.map(parse_timezone),
        }
    }
}

impl Rule for ConvertDate {
    fn code(&self) -> &'static str {
        "date"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        let offset = match &self.timezone {
            Some(Ok(offset)) => Some(*offset),
            Some(Err(err)) => return Verdict::fail(err.clone()).with_value(FieldValue::Empty),
            None => None,
        };
        let (input, output) = match (&self.input, &self.output) {
            (Ok(input), Ok(output)) => (input, output),
            (Err(err), _) | (_, Err(err)) => return Verdict::fail(err.clone()),
        };

        let Some(text) = value.as_text() else {
            let ok = value.all_text(&mut |s| input.parse_strict(s).is_some());
            return Verdict::check(ok, || {
                ValidationError::code("date").with_param("format", input.source())
            });
        };

        let converted = input
            .parse_strict(text)
            .and_then(|parsed| output.format(parsed, offset));
        match converted {
            Some(converted) => Verdict::rewrite(FieldValue::Text(converted)),
            None => Verdict::fail(
                ValidationError::code("date").with_param("format", input.source()),
            ),
        }
    }
}

/// Creates a [`ConvertDate`] rule.
#[must_use]
pub fn convert_date(input: &str, output: &str, timezone: Option<&str>) -> ConvertDate {
    ConvertDate::new(input, output, timezone)
}
