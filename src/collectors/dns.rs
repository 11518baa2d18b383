//! DNS record enumeration for a domain.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::fixtures::SeedStream;
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{DnsPayload, DnsRecord, PayloadSchema, RecordType};

pub const NAME: &str = "dns";

const DEFAULT_TTL: u32 = 3600;
const NS_TTL: u32 = 86400;

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "A, AAAA, MX, NS and TXT records",
        applies_to: &[IdentifierKind::Domain],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::Dns,
    }
}

fn record(record_type: RecordType, name: &str, value: String, ttl: u32) -> DnsRecord {
    DnsRecord {
        record_type,
        name: name.to_string(),
        value,
        ttl,
        priority: None,
    }
}

pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<DnsPayload, CollectorError> {
    let Identifier::Domain(domain) = identifier else {
        return Err(CollectorError::NotApplicable);
    };
    let apex = domain.name.as_str();
    let www = format!("www.{}", apex);
    let mut stream = SeedStream::new(seed);

    let apex_v4 = stream.documentation_ipv4();
    let mut records = vec![
        record(RecordType::A, apex, apex_v4.to_string(), DEFAULT_TTL),
        record(RecordType::A, &www, apex_v4.to_string(), DEFAULT_TTL),
    ];

    if stream.chance() {
        let v6 = stream.documentation_ipv6();
        records.push(record(RecordType::Aaaa, apex, v6.to_string(), DEFAULT_TTL));
    }

    for (idx, priority) in [10u16, 20].into_iter().enumerate() {
        records.push(DnsRecord {
            priority: Some(priority),
            ..record(
                RecordType::Mx,
                apex,
                format!("mail{}.{}", idx + 1, apex),
                DEFAULT_TTL,
            )
        });
    }

    for n in 1..=2 {
        records.push(record(RecordType::Ns, apex, format!("ns{}.{}", n, apex), NS_TTL));
    }

    records.push(record(
        RecordType::Txt,
        apex,
        format!("v=spf1 include:_spf.{} ~all", apex),
        DEFAULT_TTL,
    ));
    records.push(record(
        RecordType::Txt,
        &format!("_dmarc.{}", apex),
        format!("v=DMARC1; p=none; rua=mailto:dmarc@{}", apex),
        DEFAULT_TTL,
    ));

    Ok(DnsPayload {
        domain: apex.to_string(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;

    #[test]
    fn test_dns_record_set() {
        let id = normalize("Example.COM.").unwrap();
        let payload = fixture(&id, 7).unwrap();
        assert_eq!(payload.domain, "example.com");

        let a: Vec<_> = payload.records_of(RecordType::A).collect();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].value, a[1].value);

        let mx: Vec<_> = payload.records_of(RecordType::Mx).collect();
        assert_eq!(mx[0].priority, Some(10));
        assert_eq!(mx[1].value, "mail2.example.com");

        assert!(payload.records_of(RecordType::Ns).all(|r| r.ttl == NS_TTL));
        assert_eq!(payload.records_of(RecordType::Txt).count(), 2);
    }

    #[test]
    fn test_dns_only_for_domains() {
        let id = normalize("alice@example.com").unwrap();
        assert_eq!(fixture(&id, 7), Err(CollectorError::NotApplicable));
    }
}
