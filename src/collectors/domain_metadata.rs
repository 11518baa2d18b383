//! Registration and mail-policy overview of a domain.
//!
//! For an email target the lookup runs against the address's domain.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::fixtures::SeedStream;
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{DomainMetadataPayload, PayloadSchema};
use std::net::IpAddr;

pub const NAME: &str = "domain_metadata";

pub(crate) const REGISTRARS: [&str; 4] = [
    "Example Registrar, LLC",
    "Sample Domains Inc.",
    "Placeholder Names Ltd.",
    "Demo Registry Services",
];

const SUBDOMAIN_LABELS: [&str; 7] = ["www", "mail", "api", "dev", "vpn", "blog", "shop"];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "Registration, mail records and hosts of a domain",
        applies_to: &[IdentifierKind::Email, IdentifierKind::Domain],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::DomainMetadata,
    }
}

pub(crate) fn fixture(
    identifier: &Identifier,
    seed: u64,
) -> Result<DomainMetadataPayload, CollectorError> {
    let domain = match identifier {
        Identifier::Email(email) => email.domain.as_str(),
        Identifier::Domain(domain) => domain.name.as_str(),
        _ => return Err(CollectorError::NotApplicable),
    };

    let mut stream = SeedStream::new(seed);
    let registrar = stream.pick(&REGISTRARS).to_string();
    let created_year = stream.between(1995, 2020);
    let creation_date = format!(
        "{:04}-{:02}-{:02}",
        created_year,
        stream.between(1, 12),
        stream.between(1, 28)
    );
    let expiration_date = stream.date(2026, 2035);

    // "www" and "mail" are always present; the rest depend on the seed.
    let mut subdomains: Vec<String> = SUBDOMAIN_LABELS[..2]
        .iter()
        .map(|label| format!("{}.{}", label, domain))
        .collect();
    subdomains.extend(
        stream
            .subset(&SUBDOMAIN_LABELS[2..])
            .into_iter()
            .map(|label| format!("{}.{}", label, domain)),
    );

    let host_count = stream.between(1, 3);
    let mut ip_addresses: Vec<IpAddr> = Vec::new();
    while ip_addresses.len() < host_count as usize {
        let ip = IpAddr::V4(stream.documentation_ipv4());
        if !ip_addresses.contains(&ip) {
            ip_addresses.push(ip);
        }
    }

    Ok(DomainMetadataPayload {
        domain: domain.to_string(),
        registrar,
        creation_date,
        expiration_date,
        mx_records: vec![format!("mail1.{}", domain), format!("mail2.{}", domain)],
        spf_record: format!("v=spf1 include:_spf.{} ~all", domain),
        dmarc_record: format!("v=DMARC1; p=none; rua=mailto:dmarc@{}", domain),
        subdomains,
        ip_addresses,
    })
}
