//! Investigation modules selectable from the command line.
//!
//! A module fixes how the target is parsed and which collectors may run.

use crate::collectors::{dns, whois};
use crate::identifier::{normalize, normalize_as, Identifier, IdentifierKind, ValidationError};
use crate::routing::RoutingTable;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown module '{0}' (use --list-modules to see the available modules)")]
pub struct UnknownModule(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestigationModule {
    Auto,
    Email,
    Social,
    Domain,
    Dns,
    Whois,
    Ip,
    Company,
}

impl InvestigationModule {
    pub const ALL: [InvestigationModule; 8] = [
        InvestigationModule::Auto,
        InvestigationModule::Email,
        InvestigationModule::Social,
        InvestigationModule::Domain,
        InvestigationModule::Dns,
        InvestigationModule::Whois,
        InvestigationModule::Ip,
        InvestigationModule::Company,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InvestigationModule::Auto => "auto",
            InvestigationModule::Email => "email",
            InvestigationModule::Social => "social",
            InvestigationModule::Domain => "domain",
            InvestigationModule::Dns => "dns",
            InvestigationModule::Whois => "whois",
            InvestigationModule::Ip => "ip",
            InvestigationModule::Company => "company",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InvestigationModule::Auto => "Detect the target type and run every matching collector",
            InvestigationModule::Email => "Email breach, paste, social and domain investigation",
            InvestigationModule::Social => "Username search across social media platforms",
            InvestigationModule::Domain => "Domain registration, DNS and WHOIS reconnaissance",
            InvestigationModule::Dns => "DNS record enumeration",
            InvestigationModule::Whois => "WHOIS registration lookup",
            InvestigationModule::Ip => "IP address intelligence",
            InvestigationModule::Company => "Company information gathering",
        }
    }

    /// The identifier type the target is parsed as; `None` means inferred.
    pub fn kind(&self) -> Option<IdentifierKind> {
        match self {
            InvestigationModule::Auto => None,
            InvestigationModule::Email => Some(IdentifierKind::Email),
            InvestigationModule::Social => Some(IdentifierKind::Username),
            InvestigationModule::Domain | InvestigationModule::Dns | InvestigationModule::Whois => {
                Some(IdentifierKind::Domain)
            }
            InvestigationModule::Ip => Some(IdentifierKind::IpAddress),
            InvestigationModule::Company => Some(IdentifierKind::CompanyName),
        }
    }

    /// Collectors this module is limited to; `None` allows every collector.
    pub fn collector_filter(&self) -> Option<&'static [&'static str]> {
        match self {
            InvestigationModule::Dns => Some(&[dns::NAME]),
            InvestigationModule::Whois => Some(&[whois::NAME]),
            _ => None,
        }
    }

    pub fn identify(&self, raw: &str) -> Result<Identifier, ValidationError> {
        match self.kind() {
            Some(kind) => normalize_as(kind, raw),
            None => normalize(raw),
        }
    }

    pub fn routing(&self, table: &RoutingTable) -> RoutingTable {
        match self.collector_filter() {
            Some(names) => table.restrict(names),
            None => table.clone(),
        }
    }
}

impl FromStr for InvestigationModule {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        InvestigationModule::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

impl fmt::Display for InvestigationModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectorsConfig;
    use crate::fixtures::FixtureSource;
    use std::sync::Arc;

    #[test]
    fn test_parse_module_names() {
        assert_eq!("email".parse::<InvestigationModule>(), Ok(InvestigationModule::Email));
        assert_eq!(" WHOIS ".parse::<InvestigationModule>(), Ok(InvestigationModule::Whois));
        assert_eq!(
            "phone".parse::<InvestigationModule>(),
            Err(UnknownModule("phone".to_string()))
        );
    }

    #[test]
    fn test_module_parses_target_as_its_kind() {
        let id = InvestigationModule::Social.identify("Alice.Dev").unwrap();
        assert_eq!(id.kind(), IdentifierKind::Username);

        let err = InvestigationModule::Email.identify("not-an-email").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedEmail(_)));

        let id = InvestigationModule::Auto.identify("198.51.100.7").unwrap();
        assert_eq!(id.kind(), IdentifierKind::IpAddress);
    }

    #[test]
    fn test_dns_module_limits_collectors() {
        let table = RoutingTable::standard(&CollectorsConfig::default(), Arc::new(FixtureSource));
        let routed = InvestigationModule::Dns.routing(&table);
        let names: Vec<&str> = routed.specs().map(|s| s.name).collect();
        assert_eq!(names, vec!["dns"]);
        assert_eq!(InvestigationModule::Domain.routing(&table).len(), table.len());
    }
}
