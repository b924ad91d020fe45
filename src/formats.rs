//! The `format` keyword: a process-wide registry of named checkers.
//!
//! Checkers are predicates over strings; the compiler rejects schemas whose
//! `format` names no registered checker, and the validator consults the
//! registry again at run time.
use ahash::AHashMap;
use chrono::DateTime;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    sync::Arc,
};
use url::Url;

static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("Is a valid regex")
});

/// Predicate applied to string instances by the `format` keyword.
pub trait FormatChecker: Send + Sync {
    /// Whether `input` is well-formed for this format.
    fn is_format(&self, input: &str) -> bool;
}

/// RFC 3339 `date-time` strings.
#[derive(Debug, Default)]
pub struct DateTimeFormatChecker;

impl FormatChecker for DateTimeFormatChecker {
    fn is_format(&self, input: &str) -> bool {
        DateTime::parse_from_rfc3339(input).is_ok()
    }
}

/// Loose e-mail addresses, the way draft 4 suites expect them.
#[derive(Debug, Default)]
pub struct EmailFormatChecker;

impl FormatChecker for EmailFormatChecker {
    fn is_format(&self, input: &str) -> bool {
        input.contains('@')
    }
}

/// RFC 1034 host names.
#[derive(Debug, Default)]
pub struct HostnameFormatChecker;

impl FormatChecker for HostnameFormatChecker {
    fn is_format(&self, input: &str) -> bool {
        input.len() <= 253 && HOSTNAME_RE.is_match(input)
    }
}

/// Dotted-quad IPv4 addresses.
#[derive(Debug, Default)]
pub struct Ipv4FormatChecker;

impl FormatChecker for Ipv4FormatChecker {
    fn is_format(&self, input: &str) -> bool {
        input.parse::<Ipv4Addr>().is_ok()
    }
}

/// RFC 2373 IPv6 addresses.
#[derive(Debug, Default)]
pub struct Ipv6FormatChecker;

impl FormatChecker for Ipv6FormatChecker {
    fn is_format(&self, input: &str) -> bool {
        input.parse::<Ipv6Addr>().is_ok()
    }
}

/// Absolute URIs.
#[derive(Debug, Default)]
pub struct UriFormatChecker;

impl FormatChecker for UriFormatChecker {
    fn is_format(&self, input: &str) -> bool {
        Url::parse(input).is_ok()
    }
}

/// Strings that compile as a regular expression.
#[derive(Debug, Default)]
pub struct RegexFormatChecker;

impl FormatChecker for RegexFormatChecker {
    fn is_format(&self, input: &str) -> bool {
        fancy_regex::Regex::new(input).is_ok()
    }
}

struct FormatCheckerRegistry {
    checkers: AHashMap<String, Arc<dyn FormatChecker>>,
}

impl FormatCheckerRegistry {
    fn with_defaults() -> Self {
        let mut checkers: AHashMap<String, Arc<dyn FormatChecker>> = AHashMap::new();
        checkers.insert("date-time".to_string(), Arc::new(DateTimeFormatChecker));
        checkers.insert("email".to_string(), Arc::new(EmailFormatChecker));
        checkers.insert("hostname".to_string(), Arc::new(HostnameFormatChecker));
        checkers.insert("ipv4".to_string(), Arc::new(Ipv4FormatChecker));
        checkers.insert("ipv6".to_string(), Arc::new(Ipv6FormatChecker));
        checkers.insert("uri".to_string(), Arc::new(UriFormatChecker));
        checkers.insert("regex".to_string(), Arc::new(RegexFormatChecker));
        FormatCheckerRegistry { checkers }
    }
}

static FORMAT_CHECKERS: Lazy<RwLock<FormatCheckerRegistry>> =
    Lazy::new(|| RwLock::new(FormatCheckerRegistry::with_defaults()));

/// Register `checker` under `name`, replacing any previous checker.
pub fn register(name: impl Into<String>, checker: Arc<dyn FormatChecker>) {
    FORMAT_CHECKERS.write().checkers.insert(name.into(), checker);
}

/// Remove the checker registered under `name`.
pub fn unregister(name: &str) {
    FORMAT_CHECKERS.write().checkers.remove(name);
}

/// Whether a checker is registered under `name`.
pub fn has(name: &str) -> bool {
    FORMAT_CHECKERS.read().checkers.contains_key(name)
}

/// Apply the checker registered under `name`; unknown names fail.
pub fn check(name: &str, input: &str) -> bool {
    FORMAT_CHECKERS
        .read()
        .checkers
        .get(name)
        .map_or(false, |checker| checker.is_format(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("date-time", "2018-11-13T20:20:39+00:00", true)]
    #[test_case("date-time", "2018-11-13T20:20:39Z", true)]
    #[test_case("date-time", "2018-11-13", false)]
    #[test_case("email", "joe.bloggs@example.com", true)]
    #[test_case("email", "not-an-email", false)]
    #[test_case("hostname", "www.example.com", true)]
    #[test_case("hostname", "-not-valid-", false)]
    #[test_case("ipv4", "192.168.0.1", true)]
    #[test_case("ipv4", "256.0.0.1", false)]
    #[test_case("ipv6", "::1", true)]
    #[test_case("ipv6", "12345::", false)]
    #[test_case("uri", "http://example.com/path", true)]
    #[test_case("uri", "not a uri", false)]
    #[test_case("regex", "^x[0-9]*$", true)]
    #[test_case("regex", "[", false)]
    fn builtin_checkers(name: &str, input: &str, expected: bool) {
        assert!(has(name));
        assert_eq!(check(name, input), expected)
    }

    #[test]
    fn unknown_format_fails_check() {
        assert!(!has("no-such-format"));
        assert!(!check("no-such-format", "anything"))
    }

    struct EvenLength;
    impl FormatChecker for EvenLength {
        fn is_format(&self, input: &str) -> bool {
            input.len() % 2 == 0
        }
    }

    #[test]
    fn register_and_unregister() {
        register("even-length", Arc::new(EvenLength));
        assert!(has("even-length"));
        assert!(check("even-length", "ab"));
        assert!(!check("even-length", "abc"));
        unregister("even-length");
        assert!(!has("even-length"));
    }
}
