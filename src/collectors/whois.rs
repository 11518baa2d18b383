//! WHOIS registration lookup.

use super::domain_metadata::REGISTRARS;
use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::fixtures::SeedStream;
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{PayloadSchema, WhoisContact, WhoisPayload};

pub const NAME: &str = "whois";

const STATUS_CODES: [&str; 4] = [
    "clientTransferProhibited",
    "clientUpdateProhibited",
    "clientDeleteProhibited",
    "serverTransferProhibited",
];

// (state, country)
const REGIONS: [(&str, &str); 4] = [("CA", "US"), ("NY", "US"), ("ON", "CA"), ("BE", "DE")];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "WHOIS registration record of a domain",
        applies_to: &[IdentifierKind::Domain],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::Whois,
    }
}

/// Turns a registrar name into the host part of its whois server.
fn registrar_host(registrar: &str) -> String {
    registrar
        .split(|c: char| c == ',' || c == '.')
        .next()
        .unwrap_or(registrar)
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<WhoisPayload, CollectorError> {
    let Identifier::Domain(domain) = identifier else {
        return Err(CollectorError::NotApplicable);
    };
    // WHOIS is held for the registered name, not for a subdomain of it.
    let registered = domain.registrable.as_deref().unwrap_or(&domain.name);
    let mut stream = SeedStream::new(seed);

    let registrar = *stream.pick(&REGISTRARS);
    let host = registrar_host(registrar);
    let creation_date = stream.date(1995, 2015);
    let updated_date = stream.date(2016, 2025);
    let expiration_date = stream.date(2026, 2035);

    let mut status: Vec<String> = STATUS_CODES[..2].iter().map(|s| s.to_string()).collect();
    status.extend(stream.subset(&STATUS_CODES[2..]).into_iter().map(|s| s.to_string()));

    let (state, country) = *stream.pick(&REGIONS);
    let privacy = stream.chance();
    let contact = WhoisContact {
        organization: if privacy {
            "REDACTED FOR PRIVACY".to_string()
        } else {
            "Example Organization".to_string()
        },
        state: state.to_string(),
        country: country.to_string(),
        privacy,
    };

    Ok(WhoisPayload {
        domain: registered.to_string(),
        registrar: registrar.to_string(),
        whois_server: format!("whois.{}.com", host),
        referral_url: format!("http://www.{}.com", host),
        updated_date,
        creation_date,
        expiration_date,
        name_servers: vec![
            format!("NS1.{}", registered.to_uppercase()),
            format!("NS2.{}", registered.to_uppercase()),
        ],
        status,
        registrant: contact.clone(),
        admin: contact.clone(),
        tech: contact,
    })
}
