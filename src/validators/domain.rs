//! Domain allow/deny checks for email and URL fields

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{CheckResult, Validate, ValidationContext};

pub const INVALID_EMAIL: &str = "Invalid email format";
pub const EMAIL_DOMAIN_NOT_ALLOWED: &str = "Email domain is not allowed";
pub const INVALID_URL: &str = "Invalid URL format";
pub const URL_DOMAIN_NOT_ALLOWED: &str = "URL domain is not allowed";

static EMAIL_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

// optional scheme and www. prefix, host is everything up to the first slash
static URL_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?://)?(www\.)?([^/]+)").expect("url pattern is valid"));

/// Lower-cased allow and deny lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub except_domains: Option<Vec<String>>,
}

impl DomainPolicy {
    /// Builds a policy; empty lists count as unconfigured.
    pub fn new(allowed: Option<Vec<String>>, excepted: Option<Vec<String>>) -> Self {
        let normalise = |list: Option<Vec<String>>| {
            list.filter(|l| !l.is_empty())
                .map(|l| l.into_iter().map(|d| d.to_lowercase()).collect())
        };
        Self {
            allowed_domains: normalise(allowed),
            except_domains: normalise(excepted),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.allowed_domains.is_some() || self.except_domains.is_some()
    }

    /// Returns whether `domain` passes both lists. `domain` must be lower-cased.
    pub fn permits(&self, domain: &str) -> bool {
        let allowed = self
            .allowed_domains
            .as_ref()
            .map_or(true, |list| list.iter().any(|d| d == domain));
        let excepted = self
            .except_domains
            .as_ref()
            .map_or(false, |list| list.iter().any(|d| d == domain));
        allowed && !excepted
    }
}

fn is_blank(value: &Value) -> bool {
    value.as_str().map_or(false, |s| s.trim().is_empty())
}

/// Email format and domain check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailValidator {
    #[serde(flatten)]
    pub policy: DomainPolicy,
    /// Blank values pass when set
    pub optional: bool,
}

impl EmailValidator {
    pub fn new(policy: DomainPolicy, optional: bool) -> Self {
        Self { policy, optional }
    }
}

impl Validate for EmailValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> CheckResult {
        if self.optional && is_blank(value) {
            return CheckResult::pass();
        }

        let Some(email) = value.as_str().filter(|s| EMAIL_FORMAT.is_match(s)) else {
            return CheckResult::fail(INVALID_EMAIL);
        };

        let domain = email
            .split('@')
            .nth(1)
            .unwrap_or_default()
            .to_lowercase();

        let allowed = self.policy.permits(&domain);
        if !allowed {
            tracing::trace!(field = ctx.key, domain = %domain, "email domain rejected");
        }
        CheckResult::check(allowed, EMAIL_DOMAIN_NOT_ALLOWED)
    }
}

/// URL host check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlValidator {
    #[serde(flatten)]
    pub policy: DomainPolicy,
    /// Blank values pass when set
    pub optional: bool,
}

impl UrlValidator {
    pub fn new(policy: DomainPolicy, optional: bool) -> Self {
        Self { policy, optional }
    }

    /// Extracts the lower-cased host, without scheme or `www.`
    pub fn host(url: &str) -> Option<String> {
        URL_HOST
            .captures(url)
            .and_then(|caps| caps.get(3))
            .map(|m| m.as_str().to_lowercase())
    }
}

impl Validate for UrlValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> CheckResult {
        if self.optional && is_blank(value) {
            return CheckResult::pass();
        }

        let Some(host) = value.as_str().and_then(Self::host) else {
            return CheckResult::fail(INVALID_URL);
        };

        let allowed = self.policy.permits(&host);
        if !allowed {
            tracing::trace!(field = ctx.key, host = %host, "url host rejected");
        }
        CheckResult::check(allowed, URL_DOMAIN_NOT_ALLOWED)
    }
}
