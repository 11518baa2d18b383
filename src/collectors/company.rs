//! Company profile: footprint on the web, size and leadership.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::fixtures::SeedStream;
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{CompanyPayload, KeyPerson, PayloadSchema};

pub const NAME: &str = "company";

const INDUSTRIES: [&str; 5] = [
    "Technology",
    "Financial Services",
    "Healthcare",
    "Manufacturing",
    "Retail",
];

// (employees, revenue) bands, smallest first.
const SIZE_BANDS: [(&str, &str); 4] = [
    ("11-50", "$1M-$10M"),
    ("51-200", "$10M-$50M"),
    ("1,000-5,000", "$100M-$500M"),
    ("10,000+", "$1B+"),
];

const HEADQUARTERS: [&str; 4] = [
    "San Francisco, CA",
    "New York, NY",
    "Austin, TX",
    "London, UK",
];

const EMAIL_FORMATS: [&str; 3] = ["firstname.lastname", "f.lastname", "firstname"];

const KEY_PEOPLE: [(&str, &str); 3] = [
    ("John Smith", "CEO"),
    ("Jane Doe", "CTO"),
    ("Bob Johnson", "CFO"),
];

const TLDS: [&str; 3] = ["com", "net", "org"];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "Company profile, domains and key people",
        applies_to: &[IdentifierKind::CompanyName],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::Company,
    }
}

pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<CompanyPayload, CollectorError> {
    let Identifier::CompanyName(company) = identifier else {
        return Err(CollectorError::NotApplicable);
    };
    if company.slug.is_empty() {
        return Err(CollectorError::UpstreamFailure(format!(
            "no web presence can be derived from '{}'",
            company.display
        )));
    }
    let slug = company.slug.as_str();
    let mut stream = SeedStream::new(seed);

    let (employees, revenue) = *stream.pick(&SIZE_BANDS);
    let email_format = format!("{}@{}.com", stream.pick(&EMAIL_FORMATS), slug);

    Ok(CompanyPayload {
        name: identifier.canonical().to_string(),
        website: format!("https://www.{}.com", slug),
        founded: stream.between(1950, 2020) as u16,
        industry: stream.pick(&INDUSTRIES).to_string(),
        employees: employees.to_string(),
        headquarters: stream.pick(&HEADQUARTERS).to_string(),
        revenue: revenue.to_string(),
        domains: TLDS.iter().map(|tld| format!("{}.{}", slug, tld)).collect(),
        email_format,
        key_people: KEY_PEOPLE
            .iter()
            .map(|(name, title)| KeyPerson {
                name: name.to_string(),
                title: title.to_string(),
            })
            .collect(),
    })
}
