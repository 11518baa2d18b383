//! Target validation and canonicalization.
//!
//! Turns a raw target string into a typed [`Identifier`]. Everything here is
//! pure: two raw inputs that differ only in case or surrounding whitespace
//! normalize to equal identifiers, which is what keeps downstream findings
//! reproducible.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

/// Four dot-separated digit groups: an IPv4 address, possibly out of range.
static DOTTED_QUAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").expect("dotted quad pattern is valid"));

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Errors raised when a raw target cannot be turned into an identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("target is empty")]
    EmptyInput,

    #[error("malformed email address: {0}")]
    MalformedEmail(String),

    #[error("malformed domain name: {0}")]
    MalformedDomain(String),

    #[error("malformed IP address: {0}")]
    MalformedIP(String),
}

/// The type of an investigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Email,
    Domain,
    IpAddress,
    Username,
    CompanyName,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 5] = [
        IdentifierKind::Email,
        IdentifierKind::Domain,
        IdentifierKind::IpAddress,
        IdentifierKind::Username,
        IdentifierKind::CompanyName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Email => "email",
            IdentifierKind::Domain => "domain",
            IdentifierKind::IpAddress => "ip_address",
            IdentifierKind::Username => "username",
            IdentifierKind::CompanyName => "company_name",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An email address split into its parts.
#[derive(Debug, Clone)]
pub struct EmailAddress {
    /// Address as it will be displayed: local part as written, domain lower-cased.
    pub address: String,
    /// Local part as written.
    pub local_part: String,
    /// Lower-cased domain part.
    pub domain: String,
    canonical: String,
}

impl EmailAddress {
    /// The lower-cased local part, used for lookups.
    pub fn canonical_local_part(&self) -> &str {
        self.canonical
            .rsplit_once('@')
            .map(|(local, _)| local)
            .unwrap_or(&self.canonical)
    }
}

/// A DNS name.
#[derive(Debug, Clone)]
pub struct DomainName {
    /// Lower-cased name without a trailing dot.
    pub name: String,
    /// Registrable part of the name (eTLD+1), if the public suffix list knows it.
    pub registrable: Option<String>,
}

/// An IPv4 or IPv6 address.
#[derive(Debug, Clone)]
pub struct IpTarget {
    pub addr: IpAddr,
    canonical: String,
}

impl IpTarget {
    pub fn is_ipv6(&self) -> bool {
        self.addr.is_ipv6()
    }
}

/// A handle on some online platform.
#[derive(Debug, Clone)]
pub struct Username {
    /// Handle as written (trimmed).
    pub display: String,
    canonical: String,
}

/// An organisation name.
#[derive(Debug, Clone)]
pub struct CompanyName {
    /// Name as written, with whitespace runs collapsed.
    pub display: String,
    /// Lower-case alphanumeric slug, e.g. "acme corp" -> "acmecorp".
    pub slug: String,
    canonical: String,
}

/// A validated, canonical investigation target.
///
/// Equality and hashing only consider the identifier type and its canonical
/// form, so display-level differences (local-part case, padding) do not make
/// two identifiers distinct.
#[derive(Debug, Clone)]
pub enum Identifier {
    Email(EmailAddress),
    Domain(DomainName),
    IpAddress(IpTarget),
    Username(Username),
    CompanyName(CompanyName),
}

impl Identifier {
    pub fn kind(&self) -> IdentifierKind {
        match self {
            Identifier::Email(_) => IdentifierKind::Email,
            Identifier::Domain(_) => IdentifierKind::Domain,
            Identifier::IpAddress(_) => IdentifierKind::IpAddress,
            Identifier::Username(_) => IdentifierKind::Username,
            Identifier::CompanyName(_) => IdentifierKind::CompanyName,
        }
    }

    /// The canonical key of this identifier.
    pub fn canonical(&self) -> &str {
        match self {
            Identifier::Email(email) => &email.canonical,
            Identifier::Domain(domain) => &domain.name,
            Identifier::IpAddress(ip) => &ip.canonical,
            Identifier::Username(user) => &user.canonical,
            Identifier::CompanyName(company) => &company.canonical,
        }
    }

    /// The form shown to humans.
    pub fn display(&self) -> &str {
        match self {
            Identifier::Email(email) => &email.address,
            Identifier::Domain(domain) => &domain.name,
            Identifier::IpAddress(ip) => &ip.canonical,
            Identifier::Username(user) => &user.display,
            Identifier::CompanyName(company) => &company.display,
        }
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.canonical() == other.canonical()
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.canonical().hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display(), self.kind())
    }
}

/// Normalizes a raw target, inferring its type from its shape.
///
/// * contains `@` -> email
/// * parses as an IP address, or has the shape of a dotted quad -> IP address
/// * dotted name -> domain
/// * contains whitespace -> company name
/// * anything else -> username
pub fn normalize(raw: &str) -> Result<Identifier, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    normalize_as(infer_kind(trimmed), trimmed)
}

/// Normalizes a raw target as a specific identifier type.
pub fn normalize_as(kind: IdentifierKind, raw: &str) -> Result<Identifier, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    match kind {
        IdentifierKind::Email => normalize_email(trimmed).map(Identifier::Email),
        IdentifierKind::Domain => normalize_domain(trimmed).map(Identifier::Domain),
        IdentifierKind::IpAddress => normalize_ip(trimmed).map(Identifier::IpAddress),
        IdentifierKind::Username => Ok(Identifier::Username(Username {
            display: trimmed.to_string(),
            canonical: trimmed.to_lowercase(),
        })),
        IdentifierKind::CompanyName => {
            let display = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
            let canonical = display.to_lowercase();
            let slug = canonical.chars().filter(|c| c.is_alphanumeric()).collect();
            Ok(Identifier::CompanyName(CompanyName {
                display,
                slug,
                canonical,
            }))
        }
    }
}

fn infer_kind(trimmed: &str) -> IdentifierKind {
    if trimmed.contains('@') {
        IdentifierKind::Email
    } else if trimmed.parse::<IpAddr>().is_ok() || DOTTED_QUAD_RE.is_match(trimmed) {
        IdentifierKind::IpAddress
    } else if trimmed.contains('.') && !trimmed.chars().any(char::is_whitespace) {
        IdentifierKind::Domain
    } else if trimmed.chars().any(char::is_whitespace) {
        IdentifierKind::CompanyName
    } else {
        IdentifierKind::Username
    }
}

fn normalize_email(trimmed: &str) -> Result<EmailAddress, ValidationError> {
    let malformed = || ValidationError::MalformedEmail(trimmed.to_string());

    if !EMAIL_RE.is_match(trimmed) {
        return Err(malformed());
    }
    let (local_part, domain) = trimmed.rsplit_once('@').ok_or_else(malformed)?;
    let domain = canonical_dns_name(domain).ok_or_else(malformed)?;

    Ok(EmailAddress {
        address: format!("{}@{}", local_part, domain),
        local_part: local_part.to_string(),
        canonical: format!("{}@{}", local_part.to_lowercase(), domain),
        domain,
    })
}

fn normalize_domain(trimmed: &str) -> Result<DomainName, ValidationError> {
    let name = canonical_dns_name(trimmed)
        .ok_or_else(|| ValidationError::MalformedDomain(trimmed.to_string()))?;
    let registrable = psl::domain_str(&name).map(str::to_string);
    Ok(DomainName { name, registrable })
}

fn normalize_ip(trimmed: &str) -> Result<IpTarget, ValidationError> {
    let addr: IpAddr = trimmed
        .parse()
        .map_err(|_| ValidationError::MalformedIP(trimmed.to_string()))?;
    Ok(IpTarget {
        addr,
        canonical: addr.to_string(),
    })
}

/// Lower-cases and validates a DNS name, returning `None` if it is not
/// syntactically valid. A single trailing dot is accepted and removed.
fn canonical_dns_name(raw: &str) -> Option<String> {
    let name = raw.strip_suffix('.').unwrap_or(raw).to_ascii_lowercase();
    if name.is_empty() || name.len() > MAX_DOMAIN_LEN {
        return None;
    }
    let valid = name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    valid.then_some(name)
}
