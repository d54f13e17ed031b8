//! IP address rule.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

use crate::foundation::{FieldValue, Rule, RuleContext, ValidationError, Verdict};

/// Address family accepted by [`Ip`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// Dotted-quad IPv4 only.
    V4,
    /// IPv6 only.
    V6,
    /// Either family.
    #[default]
    Any,
}

/// Validates IP addresses.
///
/// # Examples
///
/// ```
/// use formcheck_validator::prelude::*;
///
/// let mut form = FormValidator::new([("host", "192.168.0.1"), ("v6", "::1")]);
/// assert!(form.field("host").ip(IpVersion::V4).is_valid());
/// assert!(!form.field("v6").ip(IpVersion::V4).is_valid());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ip {
    version: IpVersion,
}

impl Ip {
    /// Creates a rule accepting the given address family.
    #[must_use]
    pub const fn new(version: IpVersion) -> Self {
        Self { version }
    }

    /// The accepted address family.
    #[must_use]
    pub const fn version(&self) -> IpVersion {
        self.version
    }

    fn accepts(&self, input: &str) -> bool {
        match self.version {
            IpVersion::V4 => input.parse::<Ipv4Addr>().is_ok(),
            IpVersion::V6 => input.parse::<Ipv6Addr>().is_ok(),
            IpVersion::Any => input.parse::<IpAddr>().is_ok(),
        }
    }
}

impl Rule for Ip {
    fn code(&self) -> &'static str {
        "ip"
    }

    fn evaluate(&self, value: &FieldValue, _ctx: &RuleContext<'_>) -> Verdict {
        Verdict::check(value.all_text(&mut |s| self.accepts(s)), || {
            ValidationError::code("ip")
        })
    }
}

/// Creates an [`Ip`] rule.
#[must_use]
pub const fn ip(version: IpVersion) -> Ip {
    Ip::new(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::eval;
    use rstest::rstest;

    #[rstest]
    #[case(IpVersion::V4, "127.0.0.1", true)]
    #[case(IpVersion::V4, "256.0.0.1", false)]
    #[case(IpVersion::V4, "fe80::1", false)]
    #[case(IpVersion::V6, "fe80::1", true)]
    #[case(IpVersion::V6, "10.0.0.1", false)]
    #[case(IpVersion::Any, "10.0.0.1", true)]
    #[case(IpVersion::Any, "::ffff:10.0.0.1", true)]
    #[case(IpVersion::Any, "localhost", false)]
    fn test_ip(#[case] version: IpVersion, #[case] input: &str, #[case] ok: bool) {
        assert_eq!(eval(&ip(version), input.into()).is_valid(), ok);
    }
}
