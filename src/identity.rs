//! Identity Claims

use std::{fmt, str::FromStr};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authenticated actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular citizen booking spaces.
    #[default]
    User,

    /// Municipal staff.
    Admin,
}

impl Role {
    /// Persisted, upper-case representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Privileged roles bypass the cancellation notice.
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = IdentityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let name = trimmed.strip_prefix("ROLE_").unwrap_or(trimmed);

        if name.eq_ignore_ascii_case("USER") {
            Ok(Self::User)
        } else if name.eq_ignore_ascii_case("ADMIN") {
            Ok(Self::Admin)
        } else {
            Err(IdentityError::UnknownRole(value.to_string()))
        }
    }
}

/// Errors raised while resolving a principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Neither `email` nor `preferred_username` carried a value.
    #[error("token has no email claim")]
    MissingEmail,

    /// Email is not of the form `local@domain`.
    #[error("`{0}` is not a valid email address")]
    MalformedEmail(String),

    /// Email domain is not on the allow-list.
    #[error("email domain `{0}` is not allowed")]
    DomainNotAllowed(String),

    /// Role claim names no known role.
    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

/// A token claim that identity providers emit either as a scalar or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// A single string.
    Single(String),

    /// A list of strings.
    Many(Vec<String>),
}

impl ClaimValue {
    /// The trimmed scalar, or the first non-empty list element.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.trim()).filter(|value| !value.is_empty()),
            Self::Many(values) => values
                .iter()
                .map(|value| value.trim())
                .find(|value| !value.is_empty()),
        }
    }
}

/// Raw claims keyed by name.
pub type Claims = FxHashMap<String, ClaimValue>;

/// Which email domains may sign in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    allowed_email_domains: Vec<String>,
}

impl AccessPolicy {
    /// Allow only the given domains. An empty list allows every domain.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_email_domains: domains
                .into_iter()
                .map(|domain| domain.as_ref().trim().trim_start_matches('@').to_ascii_lowercase())
                .filter(|domain| !domain.is_empty())
                .collect(),
        }
    }

    /// Configured domains, lower-cased.
    pub fn allowed_email_domains(&self) -> &[String] {
        &self.allowed_email_domains
    }

    /// Whether `domain` may sign in.
    pub fn allows_domain(&self, domain: &str) -> bool {
        self.allowed_email_domains.is_empty()
            || self
                .allowed_email_domains
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Lower-cased email address.
    pub email: String,

    /// Resolved role.
    pub role: Role,
}

/// Resolve the acting principal from raw token claims.
///
/// # Errors
///
/// Returns an [`IdentityError`] when the email is missing, malformed or from
/// a disallowed domain, or when the role claim is not recognised.
pub fn resolve_principal(
    claims: &Claims,
    policy: &AccessPolicy,
) -> Result<Principal, IdentityError> {
    let email = ["email", "preferred_username"]
        .into_iter()
        .find_map(|name| claims.get(name).and_then(ClaimValue::canonical))
        .ok_or(IdentityError::MissingEmail)?
        .to_ascii_lowercase();

    let domain = match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => domain,
        _ => return Err(IdentityError::MalformedEmail(email.clone())),
    };

    if !policy.allows_domain(domain) {
        return Err(IdentityError::DomainNotAllowed(domain.to_string()));
    }

    let role = match claims.get("roles").and_then(ClaimValue::canonical) {
        Some(role) => role.parse()?,
        None => Role::default(),
    };

    Ok(Principal { email, role })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn claims(pairs: &[(&str, ClaimValue)]) -> Claims {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    fn single(value: &str) -> ClaimValue {
        ClaimValue::Single(value.to_string())
    }

    #[test]
    fn canonical_skips_blank_list_entries() {
        let value = ClaimValue::Many(vec![String::new(), "a".to_string()]);

        assert_eq!(value.canonical(), Some("a"));
        assert_eq!(ClaimValue::Many(Vec::new()).canonical(), None);
        assert_eq!(single("  ").canonical(), None);
        assert_eq!(single(" x ").canonical(), Some("x"));
    }

    #[test]
    fn claims_deserialize_from_scalar_or_list() -> TestResult {
        let parsed: Claims =
            serde_json::from_str(r#"{"email":"a@b.cr","roles":["ADMIN","USER"]}"#)?;

        assert_eq!(parsed.get("email"), Some(&single("a@b.cr")));
        assert!(matches!(parsed.get("roles"), Some(ClaimValue::Many(roles)) if roles.len() == 2));

        Ok(())
    }

    #[test]
    fn role_defaults_to_user() -> TestResult {
        let principal = resolve_principal(
            &claims(&[("email", single("Ana@Muni.go.cr"))]),
            &AccessPolicy::default(),
        )?;

        assert_eq!(principal.email, "ana@muni.go.cr");
        assert_eq!(principal.role, Role::User);

        Ok(())
    }

    #[test]
    fn falls_back_to_preferred_username() -> TestResult {
        let principal = resolve_principal(
            &claims(&[
                ("preferred_username", single("staff@muni.go.cr")),
                ("roles", ClaimValue::Many(vec![String::new(), "ROLE_ADMIN".to_string()])),
            ]),
            &AccessPolicy::new(["muni.go.cr"]),
        )?;

        assert_eq!(principal.role, Role::Admin);
        assert!(principal.role.is_privileged());

        Ok(())
    }

    #[test]
    fn rejects_disallowed_domain() {
        let result = resolve_principal(
            &claims(&[("email", single("someone@example.com"))]),
            &AccessPolicy::new(["@muni.go.cr"]),
        );

        assert_eq!(
            result,
            Err(IdentityError::DomainNotAllowed("example.com".to_string()))
        );
    }

    #[test]
    fn rejects_missing_email_and_unknown_role() {
        assert_eq!(
            resolve_principal(&Claims::default(), &AccessPolicy::default()),
            Err(IdentityError::MissingEmail)
        );

        let result = resolve_principal(
            &claims(&[("email", single("a@b.cr")), ("roles", single("ROOT"))]),
            &AccessPolicy::default(),
        );

        assert!(
            matches!(result, Err(IdentityError::UnknownRole(_))),
            "expected UnknownRole, got {result:?}"
        );
    }

    #[test]
    fn rejects_malformed_email() {
        let result = resolve_principal(
            &claims(&[("email", single("no-at-sign"))]),
            &AccessPolicy::default(),
        );

        assert!(
            matches!(result, Err(IdentityError::MalformedEmail(_))),
            "expected MalformedEmail, got {result:?}"
        );
    }
}
