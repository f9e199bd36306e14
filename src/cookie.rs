//! `Set-Cookie` encoding and `Cookie` header decoding.
//!
//! # Defaults
//!
//! Attributes left unset on a [`CookieDefinition`] are filled in when the
//! cookie is encoded, never on the definition itself:
//!
//! | Attribute | Default |
//! |---|---|
//! | `Path` | `/` |
//! | `SameSite` | `Lax` |
//! | `Expires` | now + `max_age` if set, else now + 86400 s |
//! | `HttpOnly` | on |
//! | `Max-Age` | 3600 |
//! | `Priority` | `Medium` |
//! | `Partitioned` | off |
//! | `Secure` | on |
//!
//! Note that `Expires` is derived from the caller's `max_age`, not from the
//! `Max-Age` default, so a cookie with no options carries `Max-Age=3600` and
//! an `Expires` one day out.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

const DEFAULT_PATH: &str = "/";
const DEFAULT_MAX_AGE: i64 = 3600;
const DEFAULT_EXPIRY_SECS: i64 = 86_400;

/// IMF-fixdate, the preferred HTTP-date form (RFC 9110 §5.6.7).
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// `Priority` cookie attribute.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    fn as_str(self) -> &'static str {
        match self {
            Self::Low    => "Low",
            Self::Medium => "Medium",
            Self::High   => "High",
        }
    }
}

/// `SameSite` cookie attribute.
///
/// `Enabled(true)` is shorthand for `Strict`; `Enabled(false)` drops the
/// attribute.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
    Enabled(bool),
}

impl SameSite {
    fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Strict | Self::Enabled(true) => Some("Strict"),
            Self::Lax                          => Some("Lax"),
            Self::None                         => Some("None"),
            Self::Enabled(false)               => None,
        }
    }
}

impl From<bool> for SameSite {
    fn from(b: bool) -> Self {
        Self::Enabled(b)
    }
}

/// A cookie to send with the response, before defaults are applied.
///
/// ```rust
/// use takanashi::{CookieDefinition, SameSite};
///
/// let session = CookieDefinition::new("abc")
///     .max_age(600)
///     .same_site(SameSite::Strict);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CookieDefinition {
    pub value: String,
    pub domain: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub http_only: Option<bool>,
    /// Seconds.
    pub max_age: Option<i64>,
    pub path: Option<String>,
    pub priority: Option<Priority>,
    pub partitioned: Option<bool>,
    pub same_site: Option<SameSite>,
    pub secure: Option<bool>,
}

impl CookieDefinition {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), ..Self::default() }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn expires(mut self, at: DateTime<Utc>) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn http_only(mut self, on: bool) -> Self {
        self.http_only = Some(on);
        self
    }

    pub fn max_age(mut self, secs: i64) -> Self {
        self.max_age = Some(secs);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn partitioned(mut self, on: bool) -> Self {
        self.partitioned = Some(on);
        self
    }

    pub fn same_site(mut self, same_site: impl Into<SameSite>) -> Self {
        self.same_site = Some(same_site.into());
        self
    }

    pub fn secure(mut self, on: bool) -> Self {
        self.secure = Some(on);
        self
    }
}

impl From<&str> for CookieDefinition {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CookieDefinition {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Encodes `name` + `def` as a `Set-Cookie` value, using the current time
/// for the default `Expires`.
pub fn encode(name: &str, def: &CookieDefinition) -> String {
    encode_at(name, def, Utc::now())
}

/// Encodes `name` + `def` as a `Set-Cookie` value with an explicit clock.
pub fn encode_at(name: &str, def: &CookieDefinition, now: DateTime<Utc>) -> String {
    let expires = def.expires.unwrap_or_else(|| {
        default_expiry(now, def.max_age.unwrap_or(DEFAULT_EXPIRY_SECS))
    });
    let same_site = def.same_site.unwrap_or(SameSite::Lax);

    let mut out = CookieWriter::new(name, &def.value);
    if let Some(domain) = &def.domain {
        out.pair("Domain", domain);
    }
    out.pair("Expires", expires.format(HTTP_DATE));
    out.flag("HttpOnly", def.http_only.unwrap_or(true));
    out.pair("Max-Age", def.max_age.unwrap_or(DEFAULT_MAX_AGE));
    out.pair("Path", def.path.as_deref().unwrap_or(DEFAULT_PATH));
    out.pair("Priority", def.priority.unwrap_or(Priority::Medium).as_str());
    out.flag("Partitioned", def.partitioned.unwrap_or(false));
    if let Some(same_site) = same_site.as_str() {
        out.pair("SameSite", same_site);
    }
    out.flag("Secure", def.secure.unwrap_or(true));
    out.finish()
}

/// `now + secs`, clamped to what an HTTP-date can express
/// (1970-01-01 through 9999-12-31).
fn default_expiry(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    let latest = latest_expiry();
    let fallback = if secs < 0 { DateTime::UNIX_EPOCH } else { latest };
    TimeDelta::try_seconds(secs)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(fallback)
        .clamp(DateTime::UNIX_EPOCH, latest)
}

fn latest_expiry() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map_or(DateTime::<Utc>::MAX_UTC, |t| t.and_utc())
}

struct CookieWriter(String);

impl CookieWriter {
    fn new(name: &str, value: &str) -> Self {
        Self(format!("{name}={value}"))
    }

    fn pair(&mut self, key: &str, value: impl fmt::Display) {
        self.0.push_str(&format!("; {key}={value}"));
    }

    fn flag(&mut self, key: &str, on: bool) {
        if on {
            self.0.push_str("; ");
            self.0.push_str(key);
        }
    }

    fn finish(self) -> String {
        self.0
    }
}

/// Decodes a `Cookie` request header into `name → value`.
///
/// Best effort: a pair without `=` maps its name to an empty value, and a
/// later duplicate name overwrites an earlier one. Never fails.
pub fn parse(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name.to_owned(), value.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn defaults_fill_every_unset_attribute() {
        let encoded = encode_at("sid", &CookieDefinition::new("abc"), clock());
        assert_eq!(
            encoded,
            "sid=abc; Expires=Sat, 02 Mar 2024 12:00:00 GMT; HttpOnly; Max-Age=3600; \
             Path=/; Priority=Medium; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn expires_follows_explicit_max_age() {
        let def = CookieDefinition::new("abc").max_age(60);
        let encoded = encode_at("sid", &def, clock());
        assert!(encoded.contains("Expires=Fri, 01 Mar 2024 12:01:00 GMT"));
        assert!(encoded.contains("Max-Age=60"));
    }

    #[test]
    fn huge_max_age_clamps_expires() {
        let def = CookieDefinition::new("abc").max_age(i64::MAX);
        let encoded = encode_at("sid", &def, clock());
        assert!(encoded.contains("Expires=Fri, 31 Dec 9999 23:59:59 GMT"), "{encoded}");
        assert!(encoded.contains("Max-Age=9223372036854775807"));

        // A valid chrono date, but past year 9999.
        let def = CookieDefinition::new("abc").max_age(1_000_000_000_000);
        let encoded = encode_at("sid", &def, clock());
        assert!(encoded.contains("Expires=Fri, 31 Dec 9999 23:59:59 GMT"), "{encoded}");
    }

    #[test]
    fn negative_max_age_clamps_to_epoch() {
        let def = CookieDefinition::new("abc").max_age(i64::MIN);
        let encoded = encode_at("sid", &def, clock());
        assert!(encoded.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"), "{encoded}");

        let def = CookieDefinition::new("abc").max_age(-60);
        let encoded = encode_at("sid", &def, clock());
        assert!(encoded.contains("Expires=Fri, 01 Mar 2024 11:59:00 GMT"), "{encoded}");
    }

    #[test]
    fn false_flags_are_omitted() {
        let def = CookieDefinition::new("abc")
            .http_only(false)
            .secure(false)
            .same_site(false);
        let encoded = encode_at("sid", &def, clock());
        assert!(!encoded.contains("HttpOnly"));
        assert!(!encoded.contains("Secure"));
        assert!(!encoded.contains("SameSite"));
        assert!(!encoded.contains("Partitioned"));
    }

    #[test]
    fn same_site_true_is_strict() {
        let def = CookieDefinition::new("abc").same_site(true);
        assert!(encode_at("sid", &def, clock()).contains("SameSite=Strict"));
    }

    #[test]
    fn fully_specified_definition_takes_no_defaults() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let def = CookieDefinition::new("v")
            .domain("example.com")
            .expires(expires)
            .http_only(true)
            .max_age(10)
            .path("/app")
            .priority(Priority::High)
            .partitioned(true)
            .same_site(SameSite::None)
            .secure(true);
        let before = def.clone();

        let encoded = encode_at("k", &def, clock());
        assert_eq!(
            encoded,
            "k=v; Domain=example.com; Expires=Tue, 01 Jan 2030 00:00:00 GMT; HttpOnly; \
             Max-Age=10; Path=/app; Priority=High; Partitioned; SameSite=None; Secure"
        );
        assert_eq!(encode_at("k", &def, Utc::now()), encoded);
        assert_eq!(def, before);
    }

    #[test]
    fn parses_cookie_header() {
        let jar = parse("sid=abc; theme=dark");
        assert_eq!(jar.len(), 2);
        assert_eq!(jar["sid"], "abc");
        assert_eq!(jar["theme"], "dark");
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let jar = parse("token=a=b==");
        assert_eq!(jar["token"], "a=b==");
    }

    #[test]
    fn pair_without_equals_has_empty_value() {
        let jar = parse("flag; sid=abc");
        assert_eq!(jar["flag"], "");
        assert_eq!(jar["sid"], "abc");
    }

    #[test]
    fn empty_header_yields_no_cookies() {
        assert!(parse("").is_empty());
        assert!(parse(" ; ").is_empty());
    }
}
