// src/formatting.rs

use crate::collectors::standard_specs;
use crate::core::{CollectorOutcome, OutcomeStatus};
use crate::modules::InvestigationModule;
use crate::payload::{Payload, RecordType};
use crate::report::Report;
use anyhow::Result;
use std::fmt::Write as _;

/// A trait for rendering a report into a single string.
pub trait ReportFormatter: Send + Sync {
    fn format_report(&self, report: &Report) -> Result<String>;
}

/// Renders the pretty-printed JSON report document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        report.to_json_pretty()
    }
}

/// A human-readable, sectioned text report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter {
    /// Include durations and every detail row.
    pub verbose: bool,
}

impl PlainTextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn format_outcome(&self, out: &mut String, outcome: &CollectorOutcome) {
        let _ = write!(out, "\n== {} ", outcome.collector);
        if self.verbose {
            let _ = write!(out, "({} ms) ", outcome.duration.as_millis());
        }
        out.push_str("==\n");

        match &outcome.status {
            OutcomeStatus::Ok(payload) if payload.is_empty() => {
                out.push_str("  No data found.\n");
            }
            OutcomeStatus::Ok(payload) => self.format_payload(out, payload),
            OutcomeStatus::TimedOut => out.push_str("  Timed out before reporting.\n"),
            OutcomeStatus::Failed(reason) => {
                let _ = writeln!(out, "  Failed: {}", reason);
            }
            OutcomeStatus::Skipped(reason) => {
                let _ = writeln!(out, "  Skipped: {}", reason);
            }
        }
    }

    fn format_payload(&self, out: &mut String, payload: &Payload) {
        match payload {
            Payload::Breach(p) => {
                let _ = writeln!(out, "  Found in {} data breach(es):", p.total_breaches);
                let rows: Vec<Vec<String>> = p
                    .breaches
                    .iter()
                    .map(|b| vec![b.name.clone(), b.date.clone(), b.data_classes.join(", ")])
                    .collect();
                table(out, &["Breach", "Date", "Exposed data"], &rows);
                if self.verbose {
                    for b in &p.breaches {
                        let _ = writeln!(out, "  {}: {}", b.name, b.description);
                    }
                }
            }
            Payload::Paste(p) => {
                let _ = writeln!(out, "  Found in {} paste(s):", p.pastes.len());
                let rows: Vec<Vec<String>> = p
                    .pastes
                    .iter()
                    .map(|x| vec![x.source.clone(), x.date.clone(), x.title.clone(), x.url.clone()])
                    .collect();
                table(out, &["Source", "Date", "Title", "URL"], &rows);
            }
            Payload::SocialProfiles(p) => {
                let found: Vec<_> = p.profiles.iter().filter(|x| x.exists).collect();
                let _ = writeln!(
                    out,
                    "  Profiles found for '{}': {} out of {}",
                    p.handle,
                    found.len(),
                    p.profiles.len()
                );
                let rows: Vec<Vec<String>> = found
                    .iter()
                    .map(|x| {
                        let details = x
                            .details
                            .fields()
                            .into_iter()
                            .map(|(k, v)| format!("{}: {}", k, v))
                            .collect::<Vec<_>>()
                            .join("; ");
                        vec![x.platform.clone(), x.url.clone(), details]
                    })
                    .collect();
                table(out, &["Platform", "URL", "Details"], &rows);
                let missing: Vec<&str> = p
                    .profiles
                    .iter()
                    .filter(|x| !x.exists)
                    .map(|x| x.platform.as_str())
                    .collect();
                if !missing.is_empty() {
                    let _ = writeln!(out, "  Not found on: {}", missing.join(", "));
                }
            }
            Payload::DomainMetadata(p) => {
                let ips: Vec<String> = p.ip_addresses.iter().map(|ip| ip.to_string()).collect();
                properties(
                    out,
                    &[
                        ("domain", p.domain.clone()),
                        ("registrar", p.registrar.clone()),
                        ("created", p.creation_date.clone()),
                        ("expires", p.expiration_date.clone()),
                        ("mx", p.mx_records.join(", ")),
                        ("spf", p.spf_record.clone()),
                        ("dmarc", p.dmarc_record.clone()),
                        ("subdomains", p.subdomains.join(", ")),
                        ("ip addresses", ips.join(", ")),
                    ],
                );
            }
            Payload::Dns(p) => {
                for record_type in [
                    RecordType::A,
                    RecordType::Aaaa,
                    RecordType::Mx,
                    RecordType::Ns,
                    RecordType::Txt,
                ] {
                    let rows: Vec<Vec<String>> = p
                        .records_of(record_type)
                        .map(|r| {
                            vec![
                                r.name.clone(),
                                r.value.clone(),
                                r.priority.map(|v| v.to_string()).unwrap_or_default(),
                                r.ttl.to_string(),
                            ]
                        })
                        .collect();
                    if rows.is_empty() {
                        continue;
                    }
                    let _ = writeln!(out, "  {} records:", record_type);
                    table(out, &["Name", "Value", "Priority", "TTL"], &rows);
                }
            }
            Payload::Whois(p) => {
                let contact = |c: &crate::payload::WhoisContact| {
                    format!(
                        "{} ({}, {}){}",
                        c.organization,
                        c.state,
                        c.country,
                        if c.privacy { " [privacy]" } else { "" }
                    )
                };
                properties(
                    out,
                    &[
                        ("domain", p.domain.clone()),
                        ("registrar", p.registrar.clone()),
                        ("whois server", p.whois_server.clone()),
                        ("referral url", p.referral_url.clone()),
                        ("created", p.creation_date.clone()),
                        ("updated", p.updated_date.clone()),
                        ("expires", p.expiration_date.clone()),
                        ("name servers", p.name_servers.join(", ")),
                        ("status", p.status.join(", ")),
                        ("registrant", contact(&p.registrant)),
                        ("admin", contact(&p.admin)),
                        ("tech", contact(&p.tech)),
                    ],
                );
            }
            Payload::IpIntel(p) => {
                let ports: Vec<String> = p
                    .open_ports
                    .iter()
                    .map(|port| format!("{}/{} ({})", port.port, port.protocol, port.service))
                    .collect();
                properties(
                    out,
                    &[
                        ("ip", p.ip.to_string()),
                        ("hostname", p.hostname.clone()),
                        ("location", format!("{}, {}", p.city, p.country)),
                        ("isp", p.isp.clone()),
                        ("asn", format!("AS{} {}", p.asn.as_number, p.asn.as_name)),
                        ("open ports", ports.join(", ")),
                    ],
                );
            }
            Payload::Company(p) => {
                let people: Vec<String> = p
                    .key_people
                    .iter()
                    .map(|k| format!("{} ({})", k.name, k.title))
                    .collect();
                properties(
                    out,
                    &[
                        ("name", p.name.clone()),
                        ("website", p.website.clone()),
                        ("founded", p.founded.to_string()),
                        ("industry", p.industry.clone()),
                        ("employees", p.employees.clone()),
                        ("headquarters", p.headquarters.clone()),
                        ("revenue", p.revenue.clone()),
                        ("domains", p.domains.join(", ")),
                        ("email format", p.email_format.clone()),
                        ("key people", people.join(", ")),
                    ],
                );
            }
        }
    }
}

impl ReportFormatter for PlainTextFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut out = String::new();
        let (ok, failed, skipped) = report.tally();
        let _ = writeln!(out, "Investigation of {}", report.identifier());
        let _ = writeln!(
            out,
            "Status: {} ({} ok, {} failed, {} skipped)",
            report.overall_status(),
            ok,
            failed,
            skipped
        );
        if self.verbose {
            let _ = writeln!(
                out,
                "Started {} / finished {}",
                report.started_at().to_rfc3339(),
                report.finished_at().to_rfc3339()
            );
        }
        if report.outcomes().is_empty() {
            out.push_str("\nNo collectors apply to this target.\n");
        }
        for outcome in report.outcomes() {
            self.format_outcome(&mut out, outcome);
        }
        Ok(out)
    }
}

/// Writes `label: value` rows with the labels right-padded to one width.
fn properties(out: &mut String, rows: &[(&str, String)]) {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        let _ = writeln!(out, "  {:<width$}  {}", key, value, width = width);
    }
}

/// Writes a simple aligned table.
fn table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        format!("  {}", padded.join(" | ").trim_end())
    };

    let _ = writeln!(out, "{}", line(headers.to_vec()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "  {}", rule.join("-+-"));
    for row in rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
}

/// The `--list-modules` text.
pub fn module_listing() -> String {
    let mut out = String::from("Available modules:\n");
    let width = InvestigationModule::ALL
        .iter()
        .map(|m| m.name().len())
        .max()
        .unwrap_or(0);
    for module in InvestigationModule::ALL {
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            module.name(),
            module.description(),
            width = width
        );
    }

    out.push_str("\nCollectors:\n");
    let specs = standard_specs();
    let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for spec in specs {
        let kinds: Vec<&str> = spec.applies_to.iter().map(|k| k.as_str()).collect();
        let _ = writeln!(
            out,
            "  {:<width$}  {} [{}]",
            spec.name,
            spec.description,
            kinds.join(", "),
            width = width
        );
    }
    out
}
