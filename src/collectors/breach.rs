//! Breach exposure lookups, in the style of a HaveIBeenPwned account search.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{BreachPayload, BreachRecord, PayloadSchema};

pub const NAME: &str = "breach";

struct KnownBreach {
    name: &'static str,
    date: &'static str,
    description: &'static str,
    data_classes: &'static [&'static str],
}

const CATALOG: [KnownBreach; 3] = [
    KnownBreach {
        name: "ExampleBreach",
        date: "2021-03-15",
        description: "Data breach affecting 1M users",
        data_classes: &["Email", "Password", "Username"],
    },
    KnownBreach {
        name: "AnotherBreach",
        date: "2020-07-22",
        description: "Security incident exposing user data",
        data_classes: &["Email", "IP Address", "Name"],
    },
    KnownBreach {
        name: "MajorServiceBreach",
        date: "2019-11-05",
        description: "Major service provider breach affecting 100M accounts",
        data_classes: &["Email", "Password", "Name", "Phone", "Address"],
    },
];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "Data breach exposure for an account",
        applies_to: &[IdentifierKind::Email, IdentifierKind::Username],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::Breach,
    }
}

/// Between zero and three known breaches, always taken from the head of the catalog.
pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<BreachPayload, CollectorError> {
    if !spec().applicable(identifier.kind()) {
        return Err(CollectorError::NotApplicable);
    }

    let count = (seed % 4) as usize;
    let breaches = CATALOG[..count]
        .iter()
        .map(|known| BreachRecord {
            name: known.name.to_string(),
            date: known.date.to_string(),
            description: known.description.to_string(),
            data_classes: known.data_classes.iter().map(|c| c.to_string()).collect(),
        })
        .collect();
    Ok(BreachPayload::new(breaches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;

    #[test]
    fn test_breach_count_follows_seed() {
        let id = normalize("alice@example.com").unwrap();
        for seed in 0..8u64 {
            let payload = fixture(&id, seed).unwrap();
            assert_eq!(payload.total_breaches, (seed % 4) as usize);
        }
        let all = fixture(&id, 3).unwrap();
        assert_eq!(all.first_breach.as_deref(), Some("2019-11-05"));
        assert_eq!(all.last_breach.as_deref(), Some("2021-03-15"));
    }

    #[test]
    fn test_breach_not_applicable_to_domains() {
        let id = normalize("example.com").unwrap();
        assert_eq!(fixture(&id, 1), Err(CollectorError::NotApplicable));
    }
}
