//! Typed collector payloads.
//!
//! Every collector produces exactly one payload variant with an explicit
//! schema, so heterogeneous findings can live side by side in one report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Schema tag declared by a collector for the payload it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSchema {
    Breach,
    Paste,
    SocialProfiles,
    DomainMetadata,
    Dns,
    Whois,
    IpIntel,
    Company,
}

impl PayloadSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadSchema::Breach => "breach",
            PayloadSchema::Paste => "paste",
            PayloadSchema::SocialProfiles => "social_profiles",
            PayloadSchema::DomainMetadata => "domain_metadata",
            PayloadSchema::Dns => "dns",
            PayloadSchema::Whois => "whois",
            PayloadSchema::IpIntel => "ip_intel",
            PayloadSchema::Company => "company",
        }
    }
}

impl fmt::Display for PayloadSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Findings reported by a single collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Breach(BreachPayload),
    Paste(PastePayload),
    SocialProfiles(SocialPayload),
    DomainMetadata(DomainMetadataPayload),
    Dns(DnsPayload),
    Whois(WhoisPayload),
    IpIntel(IpIntelPayload),
    Company(CompanyPayload),
}

impl Payload {
    pub fn schema(&self) -> PayloadSchema {
        match self {
            Payload::Breach(_) => PayloadSchema::Breach,
            Payload::Paste(_) => PayloadSchema::Paste,
            Payload::SocialProfiles(_) => PayloadSchema::SocialProfiles,
            Payload::DomainMetadata(_) => PayloadSchema::DomainMetadata,
            Payload::Dns(_) => PayloadSchema::Dns,
            Payload::Whois(_) => PayloadSchema::Whois,
            Payload::IpIntel(_) => PayloadSchema::IpIntel,
            Payload::Company(_) => PayloadSchema::Company,
        }
    }

    /// Number of individual findings, used to tell "no data" apart from a hit.
    pub fn finding_count(&self) -> usize {
        match self {
            Payload::Breach(p) => p.breaches.len(),
            Payload::Paste(p) => p.pastes.len(),
            Payload::SocialProfiles(p) => p.profiles.iter().filter(|p| p.exists).count(),
            Payload::DomainMetadata(_) => 1,
            Payload::Dns(p) => p.records.len(),
            Payload::Whois(_) => 1,
            Payload::IpIntel(_) => 1,
            Payload::Company(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.finding_count() == 0
    }
}

// =============================================================================
// Breach & paste exposure
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachRecord {
    pub name: String,
    pub date: String,
    pub description: String,
    pub data_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachPayload {
    pub breaches: Vec<BreachRecord>,
    pub total_breaches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_breach: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_breach: Option<String>,
}

impl BreachPayload {
    /// Builds the payload, deriving the totals and the breach date range.
    pub fn new(breaches: Vec<BreachRecord>) -> Self {
        let first_breach = breaches.iter().map(|b| b.date.clone()).min();
        let last_breach = breaches.iter().map(|b| b.date.clone()).max();
        Self {
            total_breaches: breaches.len(),
            breaches,
            first_breach,
            last_breach,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub source: String,
    pub date: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastePayload {
    pub pastes: Vec<PasteRecord>,
}

// =============================================================================
// Social profiles
// =============================================================================

/// Platform-specific profile details. Only the fields a platform exposes are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub karma: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined: Option<String>,
}

impl ProfileDetails {
    /// Returns the populated fields as `(label, value)` pairs, in a fixed order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let mut push = |label: &'static str, value: Option<String>| {
            if let Some(value) = value {
                fields.push((label, value));
            }
        };
        push("name", self.display_name.clone());
        push("headline", self.headline.clone());
        push("bio", self.bio.clone());
        push("location", self.location.clone());
        push("followers", self.followers.map(|v| v.to_string()));
        push("following", self.following.map(|v| v.to_string()));
        push("repositories", self.repositories.map(|v| v.to_string()));
        push("posts", self.posts.map(|v| v.to_string()));
        push("karma", self.karma.map(|v| v.to_string()));
        push("joined", self.joined.clone());
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub platform: String,
    pub url: String,
    pub exists: bool,
    #[serde(default)]
    pub details: ProfileDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPayload {
    pub handle: String,
    pub profiles: Vec<SocialProfile>,
}

// =============================================================================
// Domain infrastructure
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMetadataPayload {
    pub domain: String,
    pub registrar: String,
    pub creation_date: String,
    pub expiration_date: String,
    pub mx_records: Vec<String>,
    pub spf_record: String,
    pub dmarc_record: String,
    pub subdomains: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Mx,
    Ns,
    Txt,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub record_type: RecordType,
    pub name: String,
    pub value: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsPayload {
    pub domain: String,
    pub records: Vec<DnsRecord>,
}

impl DnsPayload {
    pub fn records_of(&self, record_type: RecordType) -> impl Iterator<Item = &DnsRecord> {
        self.records
            .iter()
            .filter(move |r| r.record_type == record_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisContact {
    pub organization: String,
    pub state: String,
    pub country: String,
    pub privacy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisPayload {
    pub domain: String,
    pub registrar: String,
    pub whois_server: String,
    pub referral_url: String,
    pub updated_date: String,
    pub creation_date: String,
    pub expiration_date: String,
    pub name_servers: Vec<String>,
    pub status: Vec<String>,
    pub registrant: WhoisContact,
    pub admin: WhoisContact,
    pub tech: WhoisContact,
}

// =============================================================================
// IP intelligence
// =============================================================================

/// ASN and GeoIP data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnInfo {
    /// Autonomous System Number
    pub as_number: u32,
    /// Human-readable name of the AS
    pub as_name: String,
    /// ISO country code where the IP is located
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPort {
    pub port: u16,
    pub protocol: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpIntelPayload {
    pub ip: IpAddr,
    pub hostname: String,
    pub country: String,
    pub city: String,
    pub isp: String,
    pub asn: AsnInfo,
    pub open_ports: Vec<OpenPort>,
}

// =============================================================================
// Company
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPerson {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPayload {
    pub name: String,
    pub website: String,
    pub founded: u16,
    pub industry: String,
    pub employees: String,
    pub headquarters: String,
    pub revenue: String,
    pub domains: Vec<String>,
    pub email_format: String,
    pub key_people: Vec<KeyPerson>,
}
