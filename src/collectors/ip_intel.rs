//! Network intelligence for an IP address: reverse name, location, ASN and
//! exposed services.

use super::DEFAULT_TIMEOUT;
use crate::core::{CollectorError, CollectorSpec};
use crate::fixtures::SeedStream;
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{AsnInfo, IpIntelPayload, OpenPort, PayloadSchema};

pub const NAME: &str = "ip_intel";

// (country, country code, city)
const LOCATIONS: [(&str, &str, &str); 5] = [
    ("United States", "US", "San Francisco"),
    ("United States", "US", "Ashburn"),
    ("Germany", "DE", "Frankfurt"),
    ("Netherlands", "NL", "Amsterdam"),
    ("Singapore", "SG", "Singapore"),
];

// (AS number, AS name, ISP)
const NETWORKS: [(u32, &str, &str); 4] = [
    (64496, "EXAMPLE-NET", "Example ISP"),
    (64500, "SAMPLE-HOSTING", "Sample Hosting Co."),
    (64510, "DEMO-TRANSIT", "Demo Transit Networks"),
    (65536, "DOC-CLOUD", "Documentation Cloud"),
];

const SERVICES: [(u16, &str); 6] = [
    (22, "SSH"),
    (25, "SMTP"),
    (53, "DNS"),
    (80, "HTTP"),
    (443, "HTTPS"),
    (3389, "RDP"),
];

pub fn spec() -> CollectorSpec {
    CollectorSpec {
        name: NAME,
        description: "Hostname, geolocation, ASN and open ports of an IP",
        applies_to: &[IdentifierKind::IpAddress],
        timeout: DEFAULT_TIMEOUT,
        schema: PayloadSchema::IpIntel,
    }
}

pub(crate) fn fixture(identifier: &Identifier, seed: u64) -> Result<IpIntelPayload, CollectorError> {
    let Identifier::IpAddress(target) = identifier else {
        return Err(CollectorError::NotApplicable);
    };
    let mut stream = SeedStream::new(seed);

    let (country, country_code, city) = *stream.pick(&LOCATIONS);
    let (as_number, as_name, isp) = *stream.pick(&NETWORKS);
    let host_label = if target.is_ipv6() { "host6" } else { "server" };
    let hostname = format!("{}-{}.example.net", host_label, stream.between(1, 99));

    // Web ports are almost always open; the rest are per-host.
    let mut open_ports: Vec<OpenPort> = SERVICES
        .iter()
        .filter(|(port, _)| matches!(*port, 80 | 443) || stream.chance())
        .map(|(port, service)| OpenPort {
            port: *port,
            protocol: "tcp".to_string(),
            service: service.to_string(),
        })
        .collect();
    open_ports.sort_by_key(|p| p.port);

    Ok(IpIntelPayload {
        ip: target.addr,
        hostname,
        country: country.to_string(),
        city: city.to_string(),
        isp: isp.to_string(),
        asn: AsnInfo {
            as_number,
            as_name: as_name.to_string(),
            country_code: Some(country_code.to_string()),
        },
        open_ports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;

    #[test]
    fn test_ip_intel_for_ipv4() {
        let id = normalize("203.0.113.5").unwrap();
        let payload = fixture(&id, 42).unwrap();
        assert_eq!(payload.ip.to_string(), "203.0.113.5");
        assert!(payload.hostname.starts_with("server-"));
        assert!(payload.open_ports.iter().any(|p| p.port == 443));
        assert!(payload.open_ports.windows(2).all(|w| w[0].port < w[1].port));
    }

    #[test]
    fn test_ip_intel_for_ipv6() {
        let id = normalize("2001:DB8::1").unwrap();
        let payload = fixture(&id, 42).unwrap();
        assert_eq!(payload.ip.to_string(), "2001:db8::1");
        assert!(payload.hostname.starts_with("host6-"));
    }

    #[test]
    fn test_ip_intel_only_for_addresses() {
        let id = normalize("example.com").unwrap();
        assert_eq!(fixture(&id, 42), Err(CollectorError::NotApplicable));
    }
}
